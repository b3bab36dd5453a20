//! A complete letter run, as driven by the binary.
//!
//! Checks that the roster and template exist, picks the representative
//! lookup, processes every attendee and runs the peak analysis. Printing is
//! left to the caller.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{ConfigError, EventConfig, load_api_key};
use crate::ingest::civic::{CivicClient, FallbackLookup, RepresentativeLookup};
use crate::ingest::roster::Roster;
use crate::letter::{LetterTemplate, LetterWriter, TemplateError};
use crate::logging::targets;
use crate::model::{AnalysisError, RosterError};
use crate::processor::{AttendeeProcessor, PeakReport, ProcessError, RunSummary};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build civic client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// The roster or template does not exist; nothing was written.
    InputNotFound(PathBuf),
    Completed {
        summary: RunSummary,
        /// `None` when the roster had no attendees.
        peaks: Option<PeakReport>,
    },
}

/// The first of roster and template that does not exist.
pub fn missing_input(config: &EventConfig) -> Option<&Path> {
    [&config.roster_path, &config.template_path]
        .into_iter()
        .find(|path| !path.exists())
        .map(|path| path.as_path())
}

/// Representative lookup for this run.
///
/// Offline runs never touch the credential source.
pub fn select_lookup(
    config: &EventConfig,
    offline: bool,
) -> Result<Box<dyn RepresentativeLookup>, RunError> {
    if offline {
        log::info!(target: targets::CIVIC, "offline: representative lookup disabled");
        return Ok(Box::new(FallbackLookup {
            message: config.civic.fallback_message.clone(),
        }));
    }
    let api_key = load_api_key(&config.secret_key_path)?;
    Ok(Box::new(CivicClient::new(&config.civic, api_key)?))
}

pub fn run_batch(config: &EventConfig, offline: bool) -> Result<BatchOutcome, RunError> {
    if let Some(path) = missing_input(config) {
        return Ok(BatchOutcome::InputNotFound(path.to_path_buf()));
    }

    let template = LetterTemplate::from_file(&config.template_path)?;
    let lookup = select_lookup(config, offline)?;
    let roster = Roster::open(&config.roster_path)?;
    let writer = LetterWriter::new(&config.output_dir);

    let processor =
        AttendeeProcessor::new(lookup.as_ref(), &template, &writer, config.on_output_error);
    let summary = processor.run(roster)?;
    let peaks = summary.peaks()?;

    Ok(BatchOutcome::Completed { summary, peaks })
}
