// Handlers: version, averages, reading ingestion

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::AppState;
use crate::models::Reading;
use crate::store::SnapshotStore;

/// GET /version — service name and version from Cargo.toml at build time.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/averages — resolves the snapshot (recomputing if stale). If that fails,
/// serves the last stored snapshot; 503 only when nothing was ever stored.
pub(super) async fn averages_handler(State(state): State<AppState>) -> impl IntoResponse {
    let err = match state.cache.resolve().await {
        Ok(snapshot) => return Json(snapshot).into_response(),
        Err(e) => e,
    };
    tracing::warn!(error = %err, "resolve failed; serving last stored averages");

    match state.cache.store().read_snapshot().await {
        Ok(Some(snapshot)) => Json(snapshot).into_response(),
        Ok(None) => unavailable(format!("no averages available: {}", err)),
        Err(e) => unavailable(format!("no averages available: {:#}", e)),
    }
}

#[derive(Debug, Serialize)]
struct IngestedReading {
    id: i64,
    #[serde(flatten)]
    reading: Reading,
}

/// POST /api/readings — body is the raw measured value; stamped with the current local time.
pub(super) async fn ingest_reading_handler(
    State(state): State<AppState>,
    body: String,
) -> impl IntoResponse {
    let timestamp = state.codec.format_reading_timestamp(&state.codec.now());
    let reading = Reading::new(timestamp, body.trim());

    match state.cache.store().append_reading(&reading).await {
        Ok(id) => {
            tracing::debug!(id, timestamp = %reading.timestamp, "reading stored");
            (StatusCode::CREATED, Json(IngestedReading { id, reading })).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "append_reading", "reading not stored");
            unavailable(format!("reading not stored: {:#}", e))
        }
    }
}

fn unavailable(message: String) -> axum::response::Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
