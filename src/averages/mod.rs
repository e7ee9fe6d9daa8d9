// Aggregation core: timestamp codec, window filter + averager, bucket generator.
// Pure and synchronous; store access lives in the cache manager.

mod buckets;
mod timestamp;
mod window;

pub use buckets::{BucketGenerator, HOURLY_BUCKETS, MONTHLY_BUCKETS, WEEKLY_BUCKETS};
pub use timestamp::{TimestampCodec, truncate_to_hour};
pub use window::{MalformedPolicy, average, filter_window, round2};
