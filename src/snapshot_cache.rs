// Snapshot cache manager: return the stored snapshot while it is fresh, otherwise
// recompute all three sequences from the raw readings and overwrite the slot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::averages::BucketGenerator;
use crate::error::ResolveError;
use crate::models::Snapshot;
use crate::store::{ReadingSource, SnapshotStore};

/// Default maximum snapshot age before recomputation.
pub const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Cached snapshot younger than the threshold.
    Fresh,
    /// No cached snapshot, or it is at least as old as the threshold.
    Stale,
}

/// Freshness of `cached` at `now_ms`. A `last_updated` in the future counts as fresh.
pub fn freshness(cached: Option<&Snapshot>, now_ms: i64, threshold: Duration) -> Freshness {
    let threshold_ms = i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX);
    match cached {
        Some(s) if now_ms.saturating_sub(s.last_updated) < threshold_ms => Freshness::Fresh,
        _ => Freshness::Stale,
    }
}

pub struct SnapshotCache<S> {
    store: Arc<S>,
    generator: BucketGenerator,
    threshold: Duration,
    // Held for the whole of resolve(): overlapping callers wait, then take the fresh path.
    in_flight: Mutex<()>,
}

impl<S> SnapshotCache<S>
where
    S: ReadingSource + SnapshotStore,
{
    pub fn new(store: Arc<S>, generator: BucketGenerator, threshold: Duration) -> Self {
        Self {
            store,
            generator,
            threshold,
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn resolve(&self) -> Result<Snapshot, ResolveError> {
        self.resolve_at(Utc::now()).await
    }

    /// One cache decision at `now`. Store reads and the write run strictly in order;
    /// any failure leaves the previously stored snapshot untouched.
    #[instrument(skip(self), fields(threshold_secs = self.threshold.as_secs()))]
    pub async fn resolve_at(&self, now: DateTime<Utc>) -> Result<Snapshot, ResolveError> {
        let _guard = self.in_flight.lock().await;

        let cached = self
            .store
            .read_snapshot()
            .await
            .map_err(ResolveError::StoreUnavailable)?;

        if let Some(cached) = cached
            && freshness(Some(&cached), now.timestamp_millis(), self.threshold) == Freshness::Fresh
        {
            debug!(last_updated = cached.last_updated, "returning cached averages");
            return Ok(cached);
        }

        let readings = self
            .store
            .read_all_readings()
            .await
            .map_err(ResolveError::StoreUnavailable)?;

        let local_now = now.with_timezone(&self.generator.codec().zone());
        let snapshot = self.generator.snapshot(&readings, &local_now)?;

        self.store
            .write_snapshot(&snapshot)
            .await
            .map_err(ResolveError::StoreUnavailable)?;

        info!(
            readings_count = readings.len(),
            last_updated = snapshot.last_updated,
            "new averages calculated and saved"
        );
        Ok(snapshot)
    }
}
