// Cached aggregation result. Field names on the wire are the contract other consumers read.

use serde::{Deserialize, Serialize};

/// Average over one window. `label` marks the window's end instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(rename = "timestamp")]
    pub label: String,
    /// Rounded to 2 fractional digits; serialized as a fixed-point string ("21.50").
    #[serde(rename = "temperature", with = "two_decimals")]
    pub average: f64,
}

/// Hourly, weekly and monthly bucket sequences plus the staleness marker.
/// Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "last24HourAverages")]
    pub hourly: Vec<Bucket>,
    #[serde(rename = "lastWeekAverages")]
    pub weekly: Vec<Bucket>,
    #[serde(rename = "lastMonthAverages")]
    pub monthly: Vec<Bucket>,
    /// Epoch milliseconds at computation time.
    #[serde(rename = "lastUpdated")]
    pub last_updated: i64,
}

mod two_decimals {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.2}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid average {:?}: {}", s, e)))
    }
}
