// Error taxonomy for the aggregation path.

/// A single reading could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregationError {
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("malformed value: {0:?}")]
    MalformedValue(String),
}

/// Why one `resolve()` call produced no snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("store unavailable: {0:#}")]
    StoreUnavailable(#[source] anyhow::Error),
}
