// Library for tests to access modules

pub mod agent;
pub mod aggregation;
pub mod config;
pub mod device_repo;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod models;
pub mod reporter;
pub mod routes;
pub mod version;
