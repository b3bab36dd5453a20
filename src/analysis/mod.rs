//! Registration-time statistics.
//!
//! Answers two questions about a finished batch: at which hour(s) of the day
//! and on which day(s) of the week did most attendees register. Ties are
//! preserved, never broken arbitrarily.
//!
//! Submodules:
//! - `tally` — bucket counting and the shared maximum/tie selection.
//! - `peaks` — timestamp parsing and the hour / weekday analyzers.

pub mod peaks;
pub mod tally;

pub use peaks::{format_keys, parse_registration, peak_days, peak_hours};
pub use tally::Tally;
