// Handlers: report ingestion plus the JSON read views.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use chrono::{Duration, Local};
use serde::Deserialize;

use super::AppState;
use crate::aggregation::{self, DISTRIBUTION_WINDOW_DAYS};
use crate::error::ApiError;
use crate::models::{DeviceSnapshot, DeviceView, HEARTBEAT_FORMAT};
use crate::version::{NAME, VERSION};

/// Trailing window for detail.json.
const DETAIL_WINDOW_MINUTES: i64 = 1440;

fn ok_envelope() -> serde_json::Value {
    serde_json::json!({"code": 200, "msg": "OK"})
}

/// POST /api/report — ingest one snapshot batch. Empty batches are a
/// client error and touch nothing; otherwise the whole batch is recorded
/// atomically (history append + current-state upsert per record).
pub(super) async fn report_handler(
    State(state): State<AppState>,
    Json(batch): Json<Vec<DeviceSnapshot>>,
) -> Result<impl IntoResponse, ApiError> {
    if batch.is_empty() {
        return Err(ApiError::Validation("empty report batch".into()));
    }

    state
        .repo
        .record_batch(&batch)
        .await
        .map_err(ApiError::Internal)?;

    tracing::info!(operation = "report", batch_size = batch.len(), "batch recorded");
    Ok(Json(ok_envelope()))
}

/// GET /index.json — current state, sorted by ip ascending, with seconds
/// since each device's last heartbeat.
pub(super) async fn index_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Local::now().naive_local();
    let rows = state.repo.list_devices().await.map_err(ApiError::Internal)?;

    let mut devices: Vec<DeviceView> = rows
        .into_iter()
        .map(|row| {
            let time_offset =
                chrono::NaiveDateTime::parse_from_str(&row.heartbeat_time, HEARTBEAT_FORMAT)
                    .map(|hb| (now - hb).num_seconds())
                    .unwrap_or(0);
            DeviceView {
                id: row.id,
                ip: row.ip,
                mac: row.mac,
                name: row.name,
                heartbeat_time: row.heartbeat_time,
                time_offset,
            }
        })
        .collect();
    devices.sort_by(|a, b| a.ip.cmp(&b.ip));

    Ok(Json(serde_json::json!({ "devices": devices })))
}

#[derive(Debug, Deserialize)]
pub(super) struct IpFilter {
    ip: Option<String>,
}

impl IpFilter {
    /// Trimmed filter; empty means no filter.
    fn as_option(&self) -> Option<&str> {
        match self.ip.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(ip) => Some(ip),
        }
    }
}

/// GET /detail.json?ip= — history for the trailing 1440 minutes, newest
/// first, optionally for one address.
pub(super) async fn detail_handler(
    State(state): State<AppState>,
    Query(filter): Query<IpFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Local::now().naive_local();
    let begin = (now - Duration::minutes(DETAIL_WINDOW_MINUTES))
        .format(HEARTBEAT_FORMAT)
        .to_string();
    let end = now.format(HEARTBEAT_FORMAT).to_string();

    let logs = state
        .repo
        .get_logs(&begin, &end, filter.as_option())
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(serde_json::json!({ "device_logs": logs })))
}

/// GET /distribution.json?ip= — day x hour occupancy counts over the
/// trailing 30-day window.
pub(super) async fn distribution_handler(
    State(state): State<AppState>,
    Query(filter): Query<IpFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let begin = format!(
        "{} 00:00:00",
        (today - Duration::days(DISTRIBUTION_WINDOW_DAYS)).format("%Y-%m-%d")
    );
    let end = format!("{} 23:59:59", today.format("%Y-%m-%d"));

    let times = state
        .repo
        .get_log_times(&begin, &end, filter.as_option())
        .await
        .map_err(ApiError::Internal)?;

    let distribution = aggregation::build_distribution(today, &times);
    Ok(Json(distribution))
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
