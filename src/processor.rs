//! Attendee batch processing.
//!
//! For every roster row, in file order: normalize the zipcode and phone,
//! look up representatives, render the letter and save it, and record the
//! registration time. The registration times are collected in the returned
//! `RunSummary`; peak analysis runs on that summary once the whole roster
//! has been consumed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::{format_keys, peak_days, peak_hours};
use crate::clean::{clean_phone_number, clean_zipcode};
use crate::config::OutputErrorPolicy;
use crate::ingest::civic::RepresentativeLookup;
use crate::letter::{LetterTemplate, LetterVars, LetterWriter};
use crate::logging::{log_batch_summary, targets};
use crate::model::{AnalysisError, AttendeeRecord, PeakResult, RosterError};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("Failed to write letter for attendee {id} to {path}: {source}")]
    Output {
        id: String,
        path: String,
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Run results
// ---------------------------------------------------------------------------

/// What a batch did, plus every registration time it read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Attendee rows read.
    pub total: usize,
    pub written: usize,
    /// Rows whose letter could not be written (only under `Skip`).
    pub skipped: usize,
    /// Registration times of every row read, in roster order.
    pub registrations: Vec<String>,
}

impl RunSummary {
    /// Peak hour and weekday analysis over the collected registrations.
    ///
    /// Returns `Ok(None)` for an empty batch, where no peak exists.
    pub fn peaks(&self) -> Result<Option<PeakReport>, AnalysisError> {
        if self.registrations.is_empty() {
            return Ok(None);
        }
        Ok(Some(PeakReport {
            hours: peak_hours(&self.registrations)?,
            days: peak_days(&self.registrations)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakReport {
    pub hours: PeakResult<u32>,
    pub days: PeakResult<&'static str>,
}

impl PeakReport {
    pub fn hours_line(&self) -> String {
        format!("The peak registration hours: {}", format_keys(&self.hours.keys))
    }

    pub fn days_line(&self) -> String {
        format!(
            "The days of the week most people register: {}",
            format_keys(&self.days.keys)
        )
    }
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

pub struct AttendeeProcessor<'a> {
    lookup: &'a dyn RepresentativeLookup,
    template: &'a LetterTemplate,
    writer: &'a LetterWriter,
    policy: OutputErrorPolicy,
}

impl<'a> AttendeeProcessor<'a> {
    pub fn new(
        lookup: &'a dyn RepresentativeLookup,
        template: &'a LetterTemplate,
        writer: &'a LetterWriter,
        policy: OutputErrorPolicy,
    ) -> Self {
        AttendeeProcessor {
            lookup,
            template,
            writer,
            policy,
        }
    }

    /// Render and save one attendee's letter.
    pub fn process_attendee(&self, attendee: &AttendeeRecord) -> io::Result<PathBuf> {
        let zipcode = clean_zipcode(&attendee.raw_zipcode);
        let phone = attendee
            .raw_phone
            .as_deref()
            .map(clean_phone_number)
            .unwrap_or_default();
        if phone.is_empty() && attendee.raw_phone.is_some() {
            log::debug!(
                target: targets::ROSTER,
                "[{}] phone number {:?} is not usable",
                attendee.id,
                attendee.raw_phone.as_deref().unwrap_or_default()
            );
        }

        let representatives = self.lookup.representatives(&zipcode);
        let letter = self.template.render(&LetterVars {
            id: &attendee.id,
            name: &attendee.first_name,
            zipcode: &zipcode,
            phone: &phone,
            representatives: &representatives,
        });

        let path = self.writer.save(&attendee.id, &letter)?;
        log::debug!(target: targets::LETTER, "[{}] wrote {}", attendee.id, path.display());
        Ok(path)
    }

    /// Process every row and collect registration times.
    ///
    /// A roster error stops the batch. A letter that cannot be written stops
    /// it too under `OutputErrorPolicy::Abort`; under `Skip` it is logged and
    /// counted, and the row's registration time is still collected.
    pub fn run<I>(&self, rows: I) -> Result<RunSummary, ProcessError>
    where
        I: IntoIterator<Item = Result<AttendeeRecord, RosterError>>,
    {
        let mut summary = RunSummary::default();

        for row in rows {
            let attendee = row?;
            summary.total += 1;
            summary.registrations.push(attendee.registration.clone());

            match self.process_attendee(&attendee) {
                Ok(_) => summary.written += 1,
                Err(source) => {
                    let path = self.writer.path_for(&attendee.id).display().to_string();
                    match self.policy {
                        OutputErrorPolicy::Abort => {
                            return Err(ProcessError::Output {
                                id: attendee.id,
                                path,
                                source,
                            });
                        }
                        OutputErrorPolicy::Skip => {
                            log::warn!(
                                target: targets::LETTER,
                                "[{}] skipping letter {}: {}",
                                attendee.id,
                                path,
                                source
                            );
                            summary.skipped += 1;
                        }
                    }
                }
            }
        }

        log_batch_summary(summary.total, summary.written, summary.skipped);
        Ok(summary)
    }
}
