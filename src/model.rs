//! Core data types for the event manager.
//!
//! This module defines the shared domain model imported by all other modules:
//! attendee rows, lookup results, peak results and the error types raised
//! while reading, looking up and analysing them. No I/O happens here.

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Attendee types
// ---------------------------------------------------------------------------

/// One attendee row from the roster.
///
/// `raw_zipcode` and `raw_phone` hold the cells exactly as read;
/// normalization happens in `clean` and never mutates the record. The id,
/// name and registration time are trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeRecord {
    /// Value of the first column. Unique per row but otherwise opaque.
    pub id: String,
    pub first_name: String,
    pub raw_zipcode: String,
    /// `None` when the roster has no phone column at all.
    pub raw_phone: Option<String>,
    /// Registration time, `MM/DD/YY HH:MM` (24-hour clock).
    pub registration: String,
}

// ---------------------------------------------------------------------------
// Representative lookup types
// ---------------------------------------------------------------------------

/// An elected official as returned by the Civic Information API.
///
/// Only the fields the letter uses are kept; the rest of the payload is
/// ignored by serde.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Official {
    pub name: String,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Outcome of a representative lookup.
///
/// A failed lookup is not an error for the batch: the client substitutes a
/// human-readable pointer to a public directory and the letter is still
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representatives {
    Officials(Vec<Official>),
    Fallback(String),
}

// ---------------------------------------------------------------------------
// Analysis types
// ---------------------------------------------------------------------------

/// Every bucket sharing the maximum tally, in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakResult<K> {
    pub keys: Vec<K>,
    /// The maximum count itself, shared by every key in `keys`.
    pub count: usize,
}

impl<K> PeakResult<K> {
    pub fn contains(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.keys.contains(key)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the peak analyzers.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// No timestamps were supplied, so no maximum exists.
    #[error("Validation error: cannot find a peak in an empty set of registrations")]
    EmptyInput,
    /// A timestamp does not match `MM/DD/YY HH:MM`.
    #[error("Parse error: invalid registration time '{timestamp}': {source}")]
    InvalidTimestamp {
        timestamp: String,
        source: chrono::ParseError,
    },
}

/// Errors raised while reading the attendee roster.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to open roster {path}: {source}")]
    Open { path: String, source: csv::Error },
    #[error("Failed to read roster line {lineno}: {source}")]
    Read { lineno: u64, source: csv::Error },
    #[error("Roster has no '{column}' column")]
    MissingColumn { column: &'static str },
    #[error("Roster line {lineno} has no value for '{column}'")]
    MissingField { lineno: u64, column: &'static str },
}

/// Errors that can arise when querying the Civic Information API.
///
/// These never leave the civic client: they are logged and replaced by the
/// fallback message.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Non-2xx HTTP response.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The service answered but had no officials for the address.
    #[error("No officials found for address: {0}")]
    NotFound(String),
}
