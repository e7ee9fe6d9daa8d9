// HTTP routes: averages read surface + readings ingestion sink

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::averages::TimestampCodec;
use crate::readings_repo::ReadingsRepo;
use crate::snapshot_cache::SnapshotCache;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) cache: Arc<SnapshotCache<ReadingsRepo>>,
    pub(crate) codec: TimestampCodec,
}

pub fn app(cache: Arc<SnapshotCache<ReadingsRepo>>, codec: TimestampCodec) -> Router {
    let state = AppState { cache, codec };
    Router::new()
        .route("/", get(|| async { "Sensor averages service" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/averages", get(http::averages_handler)) // GET /api/averages
        .route("/api/readings", post(http::ingest_reading_handler)) // POST /api/readings
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
