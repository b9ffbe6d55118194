// HTTP routes for the collector

mod http;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::device_repo::DeviceRepo;
use crate::error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<DeviceRepo>,
    pub(crate) token: Arc<str>,
}

pub fn app(repo: Arc<DeviceRepo>, token: &str) -> Router {
    let state = AppState {
        repo,
        token: token.into(),
    };
    let report_routes = Router::new()
        .route("/api/report", post(http::report_handler)) // POST /api/report
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_token,
        ));

    Router::new()
        .route("/index.json", get(http::index_handler)) // GET /index.json
        .route("/detail.json", get(http::detail_handler)) // GET /detail.json?ip=
        .route("/distribution.json", get(http::distribution_handler)) // GET /distribution.json?ip=
        .route("/version", get(http::version_handler)) // GET /version
        .route("/favicon.ico", get(|| async {})) // GET /favicon.ico -> 200 empty
        .merge(report_routes)
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Shared-secret gate for the report endpoints. Runs before body parsing;
/// a mismatch answers 401 with nothing beyond the generic status.
async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented != state.token.as_ref() {
        return ApiError::Authorization.into_response();
    }
    next.run(request).await
}
