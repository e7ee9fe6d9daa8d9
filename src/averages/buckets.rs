// Bucket generator: walks back from "now" in fixed-width windows, oldest bucket first.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use super::timestamp::{TimestampCodec, truncate_to_hour};
use super::window::{MalformedPolicy, average, filter_window, round2};
use crate::error::AggregationError;
use crate::models::{Bucket, Reading, Snapshot};

pub const HOURLY_BUCKETS: usize = 24;
pub const WEEKLY_BUCKETS: usize = 7;
pub const MONTHLY_BUCKETS: usize = 30;

/// Computes bucket sequences from a full set of readings.
#[derive(Debug, Clone, Copy)]
pub struct BucketGenerator {
    codec: TimestampCodec,
    policy: MalformedPolicy,
}

impl BucketGenerator {
    pub fn new(codec: TimestampCodec, policy: MalformedPolicy) -> Self {
        Self { codec, policy }
    }

    pub fn codec(&self) -> &TimestampCodec {
        &self.codec
    }

    /// 24 one-hour buckets ending at the top of the current hour, labeled `DD/MM/YYYY, HH:00`.
    pub fn hourly(
        &self,
        readings: &[Reading],
        now: &DateTime<Tz>,
    ) -> Result<Vec<Bucket>, AggregationError> {
        let top_of_hour = truncate_to_hour(now);
        self.walk_back(readings, &top_of_hour, TimeDelta::hours(1), HOURLY_BUCKETS, |end| {
            self.codec.format_hour_label(end)
        })
    }

    /// `days` 24-hour buckets ending at `now` (not truncated), labeled `DD/MM/YYYY`.
    pub fn daily(
        &self,
        readings: &[Reading],
        days: usize,
        now: &DateTime<Tz>,
    ) -> Result<Vec<Bucket>, AggregationError> {
        self.walk_back(readings, now, TimeDelta::hours(24), days, |end| {
            self.codec.format_day_label(end)
        })
    }

    /// Hourly, weekly and monthly sequences stamped with `now`.
    pub fn snapshot(
        &self,
        readings: &[Reading],
        now: &DateTime<Tz>,
    ) -> Result<Snapshot, AggregationError> {
        Ok(Snapshot {
            hourly: self.hourly(readings, now)?,
            weekly: self.daily(readings, WEEKLY_BUCKETS, now)?,
            monthly: self.daily(readings, MONTHLY_BUCKETS, now)?,
            last_updated: now.timestamp_millis(),
        })
    }

    /// Window `i` covers `[end - (i+1)*width, end - i*width]`. Windows are discovered
    /// newest first and pushed to the front, so the result is ascending in time.
    fn walk_back(
        &self,
        readings: &[Reading],
        end: &DateTime<Tz>,
        width: TimeDelta,
        count: usize,
        label: impl Fn(&DateTime<Tz>) -> String,
    ) -> Result<Vec<Bucket>, AggregationError> {
        let mut buckets = VecDeque::with_capacity(count);
        let mut window_end = *end;
        for _ in 0..count {
            let window_start = window_end - width;
            let subset = filter_window(
                &self.codec,
                readings,
                &window_start,
                &window_end,
                self.policy,
            )?;
            buckets.push_front(Bucket {
                label: label(&window_end),
                average: round2(average(&subset, self.policy)?),
            });
            window_end = window_start;
        }
        Ok(buckets.into())
    }
}
