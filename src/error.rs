// Error taxonomy. Agent-side failures that survive local recovery become
// AgentError; collector handlers return ApiError, mapped to a status at the
// boundary by its IntoResponse impl.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The configured network prefix could not be parsed. Fatal at startup.
    #[error("invalid network prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// Report delivery failed after all retry attempts. Recoverable: the
    /// cycle loop logs it and waits for the next cycle.
    #[error("report delivery to {url} failed after {attempts} attempts: {reason}")]
    Transport {
        url: String,
        attempts: u32,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized")]
    Authorization,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authorization => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            tracing::error!(error = %e, "request failed");
        }
        let status = self.status();
        // Same {code,msg} envelope on every error; no detail beyond the
        // generic status text leaks to the client.
        let body = axum::Json(serde_json::json!({
            "code": status.as_u16(),
            "msg": status.canonical_reason().unwrap_or("Error"),
        }));
        (status, body).into_response()
    }
}
