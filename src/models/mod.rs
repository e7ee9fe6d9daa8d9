// Domain models: raw readings and the cached averages snapshot

mod reading;
mod snapshot;

pub use reading::Reading;
pub use snapshot::{Bucket, Snapshot};
