//! Event attendee processing.
//!
//! Reads an attendee roster, normalizes contact fields, looks up each
//! attendee's elected representatives, writes one thank-you letter per
//! attendee and reports when people tend to register.

pub mod analysis;
pub mod batch;
pub mod clean;
pub mod config;
pub mod ingest;
pub mod letter;
pub mod logging;
pub mod model;
pub mod processor;
