//! Structured logging for the event manager.
//!
//! Provides context-rich logging with component tags, UTC timestamps and
//! severity levels behind the `log` facade. Supports both console output
//! and an append-only log file for unattended batch runs.
//!
//! Modules log with an explicit target (`log::warn!(target: targets::CIVIC,
//! ...)`); the target picks the component tag shown in each entry.

use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;

use crate::model::LookupError;

// ---------------------------------------------------------------------------
// Targets and components
// ---------------------------------------------------------------------------

/// Log targets used across the crate.
pub mod targets {
    pub const ROSTER: &str = "event_manager::roster";
    pub const CIVIC: &str = "event_manager::civic";
    pub const LETTER: &str = "event_manager::letter";
    pub const ANALYSIS: &str = "event_manager::analysis";
    pub const SYSTEM: &str = "event_manager";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Roster,
    Civic,
    Letter,
    Analysis,
    System,
}

impl Component {
    pub fn from_target(target: &str) -> Self {
        match target {
            targets::ROSTER => Component::Roster,
            targets::CIVIC => Component::Civic,
            targets::LETTER => Component::Letter,
            targets::ANALYSIS => Component::Analysis,
            _ => Component::System,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Roster => write!(f, "ROSTER"),
            Component::Civic => write!(f, "CIVIC"),
            Component::Letter => write!(f, "LETTER"),
            Component::Analysis => write!(f, "ANALYSIS"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the address simply has no officials on record
    Expected,
    /// Unexpected failure - bad key, quota, or an API change
    Unexpected,
    /// Unknown - network trouble, cannot tell whether it will persist
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

pub struct Logger {
    /// Minimum log level to display
    min_level: LevelFilter,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    pub fn new(min_level: LevelFilter, log_file: Option<String>, console_timestamps: bool) -> Self {
        Logger {
            min_level,
            log_file,
            console_timestamps,
        }
    }

    /// Formats one file/timestamped entry.
    ///
    /// A message may name its subject (attendee id, zipcode) by starting
    /// with `[subject] `; that prefix is moved next to the component tag.
    fn format_entry(level: Level, component: Component, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let (subject, body) = split_subject(message);
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, subject_part, body)
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let component = Component::from_target(record.target());
        let message = record.args().to_string();
        let log_entry = Self::format_entry(level, component, &message);

        // Console output
        if self.console_timestamps {
            match level {
                Level::Error => eprintln!("{}", log_entry),
                Level::Warn => eprintln!("   {}", log_entry),
                Level::Info => println!("   {}", message),
                Level::Debug | Level::Trace => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                Level::Error => eprintln!("   ✗ {}: {}", component, message),
                Level::Warn => eprintln!("   ⚠ {}: {}", component, message),
                Level::Info => println!("   {}", message),
                Level::Debug | Level::Trace => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn flush(&self) {}
}

fn split_subject(message: &str) -> (Option<&str>, &str) {
    message
        .strip_prefix('[')
        .and_then(|rest| rest.split_once("] "))
        .map(|(subject, body)| (Some(subject), body))
        .unwrap_or((None, message))
}

/// Install the global logger.
///
/// Fails if a logger was already installed (e.g. by a previous call).
pub fn init_logger(
    min_level: LevelFilter,
    log_file: Option<&str>,
    console_timestamps: bool,
) -> Result<(), SetLoggerError> {
    let logger = Logger::new(min_level, log_file.map(String::from), console_timestamps);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(min_level);
    Ok(())
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a representative lookup failure.
pub fn classify_lookup_failure(err: &LookupError) -> FailureType {
    match err {
        // Rural or newly created zipcodes regularly have no match.
        LookupError::NotFound(_) => FailureType::Expected,
        // Any status error (bad key, quota, rejected request, server trouble)
        // is likely to repeat for every row that follows.
        LookupError::Http(_) | LookupError::Parse(_) => FailureType::Unexpected,
        LookupError::Transport(_) => FailureType::Unknown,
    }
}

/// Log a lookup failure with automatic classification
pub fn log_lookup_failure(zipcode: &str, err: &LookupError) {
    let failure_type = classify_lookup_failure(err);
    let message = format!(
        "[{}] representative lookup failed [{}]: {}",
        zipcode, failure_type, err
    );

    log::log!(target: targets::CIVIC, failure_level(&failure_type), "{}", message);
}

/// Level a classified failure is logged at.
pub fn failure_level(failure_type: &FailureType) -> Level {
    match failure_type {
        FailureType::Expected => Level::Debug,
        FailureType::Unexpected => Level::Error,
        FailureType::Unknown => Level::Warn,
    }
}

// ---------------------------------------------------------------------------
// Batch Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a letter batch
pub fn log_batch_summary(total: usize, written: usize, skipped: usize) {
    let message = format!(
        "Batch complete: {}/{} letters written, {} skipped",
        written, total, skipped
    );

    log::log!(
        target: targets::LETTER,
        batch_summary_level(written, skipped),
        "{}",
        message
    );
}

/// Info for a clean batch, error when every letter failed, warn otherwise.
pub fn batch_summary_level(written: usize, skipped: usize) -> Level {
    if skipped == 0 {
        Level::Info
    } else if written == 0 {
        Level::Error
    } else {
        Level::Warn
    }
}
