// Shared test helpers: fixed clock, codec, in-memory counting store

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use sensor_averages::averages::TimestampCodec;
use sensor_averages::models::{Reading, Snapshot};
use sensor_averages::store::{ReadingSource, SnapshotStore};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const ZONE: Tz = chrono_tz::Europe::Paris;

pub fn codec() -> TimestampCodec {
    TimestampCodec::new(ZONE)
}

pub fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Tz> {
    ZONE.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
}

/// 15/10/2026 14:37:12 Europe/Paris, well clear of any DST change in the last 30 days.
pub fn fixed_now() -> DateTime<Tz> {
    local(2026, 10, 15, 14, 37, 12)
}

pub fn reading(timestamp: &str, value: &str) -> Reading {
    Reading::new(timestamp, value)
}

/// In-memory store that counts each operation and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    pub readings: Mutex<Vec<Reading>>,
    pub snapshot: Mutex<Option<Snapshot>>,
    pub raw_reads: AtomicUsize,
    pub snapshot_reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail_raw_read: AtomicBool,
    pub fail_write: AtomicBool,
}

impl MemoryStore {
    pub fn with_readings(readings: Vec<Reading>) -> Self {
        Self {
            readings: Mutex::new(readings),
            ..Default::default()
        }
    }

    pub fn with_cached(self, snapshot: Snapshot) -> Self {
        *self.snapshot.lock().unwrap() = Some(snapshot);
        self
    }

    pub fn raw_reads(&self) -> usize {
        self.raw_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<Snapshot> {
        self.snapshot.lock().unwrap().clone()
    }
}

impl ReadingSource for MemoryStore {
    async fn read_all_readings(&self) -> anyhow::Result<Vec<Reading>> {
        self.raw_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_raw_read.load(Ordering::SeqCst) {
            anyhow::bail!("raw readings unavailable");
        }
        Ok(self.readings.lock().unwrap().clone())
    }
}

impl SnapshotStore for MemoryStore {
    async fn read_snapshot(&self) -> anyhow::Result<Option<Snapshot>> {
        self.snapshot_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn write_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_write.load(Ordering::SeqCst) {
            anyhow::bail!("snapshot slot unavailable");
        }
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }
}

/// Snapshot with empty sequences stamped `last_updated`.
pub fn cached_snapshot(last_updated: DateTime<Utc>) -> Snapshot {
    Snapshot {
        hourly: vec![],
        weekly: vec![],
        monthly: vec![],
        last_updated: last_updated.timestamp_millis(),
    }
}
