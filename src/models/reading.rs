// One ingested measurement, as stored in the raw readings log.

use serde::{Deserialize, Serialize};

/// A single reading. `timestamp` is `DD/MM/YYYY, HH:MM:SS` in the configured zone;
/// `value` is the measured quantity as sent by the device (not validated on ingest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    #[serde(rename = "temperature", alias = "Temperature")]
    pub value: String,
}

impl Reading {
    pub fn new(timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}
