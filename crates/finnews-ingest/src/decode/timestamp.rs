//! Timestamp resolution for `published_at`
//!
//! Accepts numeric epochs and ISO-8601-like text. Text is a date
//! (`YYYY-MM-DD` or `YYYYMMDD`), optionally followed by `T` or a space and a
//! clock (`HH`, `HH:MM`, `HH:MM:SS[.f]`, or the basic `HHMM`/`HHMMSS[.f]`),
//! optionally followed by `Z`, `±HH`, `±HHMM` or `±HH:MM`. The fraction may
//! use `.` or `,`.
//!
//! Both the unit of numeric epochs and the treatment of offset-less text are
//! policy, configurable through [`TimestampPolicy`]; the defaults are seconds
//! and UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde_json::{Number, Value};

use crate::error::IngestError;

/// Calendar date forms, extended and basic
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Clock forms, extended and basic; an hour-only clock is widened to `HH00`
const CLOCK_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

/// How to read a timestamp that carries no offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaiveTimestamps {
    /// Reinterpret the wall-clock value as UTC (not converted from local time)
    #[default]
    AssumeUtc,
    /// Reinterpret the wall-clock value in a fixed offset
    AssumeOffset(FixedOffset),
    /// Treat as unknown
    Reject,
}

impl std::str::FromStr for NaiveTimestamps {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utc" => Ok(Self::AssumeUtc),
            "reject" => Ok(Self::Reject),
            other => parse_offset(other).map(Self::AssumeOffset).ok_or_else(|| {
                IngestError::config(format!(
                    "invalid naive timestamp policy '{}': expected 'utc', 'reject' or an offset like '+03:00'",
                    s
                ))
            }),
        }
    }
}

/// Unit of numeric epoch timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpochUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl std::str::FromStr for EpochUnit {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(Self::Milliseconds),
            _ => Err(IngestError::config(format!(
                "invalid epoch unit '{}': expected 'seconds' or 'milliseconds'",
                s
            ))),
        }
    }
}

/// Policy for turning raw `published_at` values into instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampPolicy {
    pub naive: NaiveTimestamps,
    pub epoch_unit: EpochUnit,
}

impl TimestampPolicy {
    /// Resolve a raw JSON value; anything unusable yields `None`
    pub fn resolve(&self, value: &Value) -> Option<DateTime<FixedOffset>> {
        match value {
            Value::Number(n) => self.from_epoch(n),
            Value::String(s) => self.parse_text(s),
            _ => None,
        }
    }

    /// Numeric epoch, interpreted as a UTC instant
    pub fn from_epoch(&self, n: &Number) -> Option<DateTime<FixedOffset>> {
        let utc = match (n.as_i64(), self.epoch_unit) {
            (Some(secs), EpochUnit::Seconds) => DateTime::from_timestamp(secs, 0),
            (Some(millis), EpochUnit::Milliseconds) => DateTime::from_timestamp_millis(millis),
            (None, EpochUnit::Seconds) => from_fractional_seconds(n.as_f64()?),
            (None, EpochUnit::Milliseconds) => from_fractional_seconds(n.as_f64()? / 1000.0),
        };
        utc.map(|dt| dt.fixed_offset())
    }

    /// ISO-8601-like text, with or without an offset
    pub fn parse_text(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt);
        }

        match parse_iso(text)? {
            (naive, Some(offset)) => offset.from_local_datetime(&naive).single(),
            (naive, None) => self.assume(naive),
        }
    }

    /// Apply the naive policy to an offset-less timestamp
    pub fn assume(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self.naive {
            NaiveTimestamps::AssumeUtc => Some(naive.and_utc().fixed_offset()),
            NaiveTimestamps::AssumeOffset(offset) => offset.from_local_datetime(&naive).single(),
            NaiveTimestamps::Reject => None,
        }
    }
}

/// Date, optional clock and optional offset, split on the first `T` or space
fn parse_iso(text: &str) -> Option<(NaiveDateTime, Option<FixedOffset>)> {
    let (date, time) = match text.find(['T', 't', ' ']) {
        Some(i) => (&text[..i], Some(&text[i + 1..])),
        None => (text, None),
    };

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())?;

    let Some(time) = time else {
        return Some((date.and_hms_opt(0, 0, 0)?, None));
    };

    let (clock, offset) = split_offset(time)?;
    Some((date.and_time(parse_clock(clock)?), offset))
}

/// Separate a trailing `Z`, `±HH`, `±HHMM` or `±HH:MM`; a malformed offset is `None`
fn split_offset(time: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(clock) = time.strip_suffix(['Z', 'z']) {
        return Some((clock, FixedOffset::east_opt(0)));
    }

    match time.rfind(['+', '-']) {
        Some(i) => {
            let (clock, offset) = time.split_at(i);
            Some((clock, Some(parse_offset(offset)?)))
        }
        None => Some((time, None)),
    }
}

fn parse_clock(clock: &str) -> Option<NaiveTime> {
    let mut clock = clock.replace(',', ".");
    if clock.len() == 2 && clock.bytes().all(|b| b.is_ascii_digit()) {
        clock.push_str("00");
    }

    CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&clock, format).ok())
}

/// Fractional epoch seconds, rounded to the microsecond
fn from_fractional_seconds(secs: f64) -> Option<DateTime<chrono::Utc>> {
    if !secs.is_finite() || secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }

    let whole = secs.floor();
    let mut micros = ((secs - whole) * 1_000_000.0).round() as u32;
    let mut whole = whole as i64;
    if micros >= 1_000_000 {
        whole = whole.checked_add(1)?;
        micros = 0;
    }

    DateTime::from_timestamp(whole, micros * 1_000)
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };

    if ![hours, minutes].iter().all(|part| part.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
