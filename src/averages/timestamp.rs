// Timestamp codec: stored `DD/MM/YYYY, HH:MM:SS` text <-> instants in one explicit zone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::AggregationError;

/// Parses and formats reading timestamps and bucket labels in a fixed IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampCodec {
    zone: Tz,
}

impl TimestampCodec {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Current instant in the codec's zone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.zone)
    }

    /// Parses `DD/MM/YYYY, HH:MM:SS` as a local date-time in the codec's zone.
    /// Seconds may be omitted, so hour labels parse back too.
    ///
    /// An out-of-range calendar date or time is rejected as malformed. A local time that occurs twice (DST fall-back)
    /// resolves to the earlier instant; a local time skipped by a DST gap is
    /// shifted forward by the gap, as wall-clock arithmetic would.
    pub fn parse(&self, text: &str) -> Result<DateTime<Tz>, AggregationError> {
        let malformed = || AggregationError::MalformedTimestamp(text.to_string());

        let (date_part, time_part) = text.split_once(", ").ok_or_else(malformed)?;
        let [day, month, year] = split_fields::<3>(date_part, '/').ok_or_else(malformed)?;
        let [hour, minute, second] = split_fields::<3>(time_part, ':')
            .or_else(|| split_fields::<2>(time_part, ':').map(|[h, m]| [h, m, 0]))
            .ok_or_else(malformed)?;

        let year = i32::try_from(year).map_err(|_| malformed())?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)?;
        let naive = date.and_hms_opt(hour, minute, second).ok_or_else(malformed)?;
        self.localize(naive).ok_or_else(malformed)
    }

    /// `DD/MM/YYYY, HH:MM` in the codec's zone. Minutes are taken from `instant` as-is.
    pub fn format_hour_label<Z: TimeZone>(&self, instant: &DateTime<Z>) -> String {
        let local = instant.with_timezone(&self.zone);
        format!(
            "{:02}/{:02}/{:04}, {:02}:{:02}",
            local.day(),
            local.month(),
            local.year(),
            local.hour(),
            local.minute()
        )
    }

    /// `DD/MM/YYYY` in the codec's zone.
    pub fn format_day_label<Z: TimeZone>(&self, instant: &DateTime<Z>) -> String {
        let local = instant.with_timezone(&self.zone);
        format!(
            "{:02}/{:02}/{:04}",
            local.day(),
            local.month(),
            local.year()
        )
    }

    /// Full stored form `DD/MM/YYYY, HH:MM:SS`, used when stamping ingested readings.
    pub fn format_reading_timestamp<Z: TimeZone>(&self, instant: &DateTime<Z>) -> String {
        let local = instant.with_timezone(&self.zone);
        format!(
            "{}:{:02}",
            self.format_hour_label(&local),
            local.second()
        )
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        if let Some(dt) = self.zone.from_local_datetime(&naive).earliest() {
            return Some(dt);
        }
        // Inside a DST gap: interpret with the offset in force just before it.
        let before = naive.checked_sub_signed(TimeDelta::hours(1))?;
        self.zone
            .from_local_datetime(&before)
            .earliest()
            .map(|dt| dt + TimeDelta::hours(1))
    }
}

/// Splits `s` on `sep` into exactly `N` numeric fields.
fn split_fields<const N: usize>(s: &str, sep: char) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = s.split(sep);
    for slot in out.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Floors `instant` to the top of its local hour.
pub fn truncate_to_hour(instant: &DateTime<Tz>) -> DateTime<Tz> {
    let offset = TimeDelta::minutes(instant.minute() as i64)
        + TimeDelta::seconds(instant.second() as i64)
        + TimeDelta::nanoseconds(instant.nanosecond() as i64);
    *instant - offset
}
