// Window filter and averager: pure computation over readings already in memory.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;

use super::timestamp::TimestampCodec;
use crate::error::AggregationError;
use crate::models::Reading;

/// What to do with a reading whose timestamp or value cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// First malformed reading aborts the whole computation.
    #[default]
    Abort,
    /// Malformed readings are logged and left out.
    Skip,
}

/// Readings whose instant `t` satisfies `start <= t <= end`.
///
/// Both ends are inclusive, so a reading exactly on a boundary between two
/// adjacent windows lands in both of them.
pub fn filter_window<'a>(
    codec: &TimestampCodec,
    readings: &'a [Reading],
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    policy: MalformedPolicy,
) -> Result<Vec<&'a Reading>, AggregationError> {
    let mut out = Vec::new();
    for reading in readings {
        let t = match codec.parse(&reading.timestamp) {
            Ok(t) => t,
            Err(e) if policy == MalformedPolicy::Skip => {
                tracing::debug!(error = %e, "skipping reading with malformed timestamp");
                continue;
            }
            Err(e) => return Err(e),
        };
        if t >= *start && t <= *end {
            out.push(reading);
        }
    }
    Ok(out)
}

/// Arithmetic mean of the readings' values at full precision; `0.0` for an empty subset.
pub fn average(subset: &[&Reading], policy: MalformedPolicy) -> Result<f64, AggregationError> {
    let mut total = 0.0;
    let mut count = 0usize;
    for reading in subset {
        match parse_value(&reading.value) {
            Ok(v) => {
                total += v;
                count += 1;
            }
            Err(e) if policy == MalformedPolicy::Skip => {
                tracing::debug!(error = %e, "skipping reading with malformed value");
            }
            Err(e) => return Err(e),
        }
    }
    if count == 0 {
        return Ok(0.0);
    }
    Ok(total / count as f64)
}

/// Rounds to 2 fractional digits, the precision stored in a bucket.
///
/// The exact binary value is rounded once, the way a decimal `toFixed(2)` does it:
/// `1.115` (stored as 1.11499...) gives `1.11`. Exact ties, which for two digits are
/// the odd multiples of 1/8, round away from zero.
pub fn round2(value: f64) -> f64 {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return (value * 100.0).round() / 100.0;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

fn parse_value(text: &str) -> Result<f64, AggregationError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AggregationError::MalformedValue(text.to_string()))
}
