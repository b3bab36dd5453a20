//! Peak registration hour and weekday detection.
//!
//! Both analyzers are pure functions over the full list of registration
//! times collected during a batch. They parse every timestamp, bucket it
//! (hour of day 0–23, or weekday), tally the buckets and return all buckets
//! sharing the maximum count.
//!
//! # Ordering
//! Tied hours come back ascending. Tied weekdays come back in calendar
//! order starting from Sunday. The result never depends on the order of the
//! input.

use std::fmt::Display;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::analysis::tally::Tally;
use crate::model::{AnalysisError, PeakResult};

/// Roster registration format, e.g. `11/12/08 10:47`.
pub const REGISTRATION_FORMAT: &str = "%m/%d/%y %H:%M";

/// Full English weekday names, indexed by days since Sunday.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a roster registration time.
///
/// Surrounding whitespace is ignored. Single-digit months, days and hours
/// (`1/5/09 9:05`) are accepted.
pub fn parse_registration(timestamp: &str) -> Result<NaiveDateTime, AnalysisError> {
    NaiveDateTime::parse_from_str(timestamp.trim(), REGISTRATION_FORMAT).map_err(|source| {
        AnalysisError::InvalidTimestamp {
            timestamp: timestamp.to_string(),
            source,
        }
    })
}

// ---------------------------------------------------------------------------
// Analyzers
// ---------------------------------------------------------------------------

/// Hours of the day (0–23) with the most registrations.
///
/// # Errors
/// - `AnalysisError::EmptyInput` if `timestamps` is empty.
/// - `AnalysisError::InvalidTimestamp` for the first timestamp that does not
///   match `REGISTRATION_FORMAT`.
pub fn peak_hours<S: AsRef<str>>(timestamps: &[S]) -> Result<PeakResult<u32>, AnalysisError> {
    let hours = bucket_all(timestamps, |dt| dt.hour())?;
    hours.into_iter().collect::<Tally<u32>>().peak()
}

/// Weekdays with the most registrations, as full English names.
///
/// Errors are the same as for `peak_hours`.
pub fn peak_days<S: AsRef<str>>(
    timestamps: &[S],
) -> Result<PeakResult<&'static str>, AnalysisError> {
    let days = bucket_all(timestamps, |dt| dt.weekday().num_days_from_sunday())?;
    let peak = days.into_iter().collect::<Tally<u32>>().peak()?;

    Ok(PeakResult {
        keys: peak.keys.iter().map(|&d| DAY_NAMES[d as usize]).collect(),
        count: peak.count,
    })
}

/// Parses every timestamp and maps it to its bucket key.
fn bucket_all<S, F>(timestamps: &[S], bucket: F) -> Result<Vec<u32>, AnalysisError>
where
    S: AsRef<str>,
    F: Fn(&NaiveDateTime) -> u32,
{
    if timestamps.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    timestamps
        .iter()
        .map(|ts| parse_registration(ts.as_ref()).map(|dt| bucket(&dt)))
        .collect()
}

/// Joins peak keys for display: `9, 14`.
pub fn format_keys<K: Display>(keys: &[K]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
