// Background scheduler: resolve the averages snapshot once at start, then every
// poll_interval. Most ticks take the cheap fresh path; recomputation is gated by
// the cache's refresh threshold.

use std::sync::Arc;
use std::time::Duration;

use crate::snapshot_cache::SnapshotCache;
use crate::store::{ReadingSource, SnapshotStore};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
}

/// Spawns the resolve loop. Returns when `shutdown_rx` fires or its sender is dropped.
pub fn spawn<S>(
    cache: Arc<SnapshotCache<S>>,
    config: SchedulerConfig,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()>
where
    S: ReadingSource + SnapshotStore + 'static,
{
    tokio::spawn(async move {
        run(cache, config, shutdown_rx).await;
    })
}

#[instrument(skip(cache, shutdown_rx), fields(poll_interval_secs = config.poll_interval.as_secs()))]
async fn run<S>(
    cache: Arc<SnapshotCache<S>>,
    config: SchedulerConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) where
    S: ReadingSource + SnapshotStore,
{
    // First tick completes immediately: the process-start run.
    let mut poll = tokio::time::interval(config.poll_interval);
    poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                debug!("checking for new temperature data");
                run_one_tick(&cache).await;
            }
            _ = &mut shutdown_rx => {
                debug!("scheduler shutting down");
                break;
            }
        }
    }
}

/// One resolve; failures are logged and dropped. The next tick is the only retry.
pub async fn run_one_tick<S>(cache: &SnapshotCache<S>)
where
    S: ReadingSource + SnapshotStore,
{
    if let Err(e) = cache.resolve().await {
        warn!(error = %e, "error fetching or calculating averages");
    }
}
