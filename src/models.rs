// Wire and storage records. Field names match the JSON contract exactly.

use serde::{Deserialize, Serialize};

/// Timestamp format used everywhere: local time, second precision.
pub const HEARTBEAT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time as a heartbeat string.
pub fn current_heartbeat_time() -> String {
    chrono::Local::now().format(HEARTBEAT_FORMAT).to_string()
}

/// One discovered device in one cycle. Built by the agent, sent in the
/// report batch, and the shape the ingestion endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub ip: String,
    /// Hardware address; empty when the neighbor table had no entry.
    pub mac: String,
    /// Reverse-resolved host name; empty when resolution failed.
    pub name: String,
    pub heartbeat_time: String,
}

/// Current-state row: the latest snapshot seen for one ip.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRow {
    pub id: i64,
    pub ip: String,
    pub mac: String,
    pub name: String,
    pub heartbeat_time: String,
}

/// Append-only history row; one per reported snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceLogRow {
    pub id: i64,
    pub ip: String,
    pub mac: String,
    pub name: String,
    pub heartbeat_time: String,
}

/// index.json entry: a DeviceRow plus seconds since its last heartbeat.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceView {
    pub id: i64,
    pub ip: String,
    pub mac: String,
    pub name: String,
    pub heartbeat_time: String,
    pub time_offset: i64,
}
