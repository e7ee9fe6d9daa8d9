// Collaborator contracts the cache manager depends on.
// The SQLite implementation lives in readings_repo; tests substitute in-memory stores.

use std::future::Future;

use crate::models::{Reading, Snapshot};

/// Read-only view of the raw readings log.
pub trait ReadingSource: Send + Sync {
    /// Every reading currently stored, in no particular order.
    fn read_all_readings(&self) -> impl Future<Output = anyhow::Result<Vec<Reading>>> + Send;
}

/// The single slot holding the latest computed snapshot.
pub trait SnapshotStore: Send + Sync {
    /// `None` if no snapshot was ever written.
    fn read_snapshot(&self) -> impl Future<Output = anyhow::Result<Option<Snapshot>>> + Send;

    /// Replaces the stored snapshot as one atomic unit.
    fn write_snapshot(
        &self,
        snapshot: &Snapshot,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
