use std::path::PathBuf;

use clap::Parser;

use event_manager::config::{ConfigError, EventConfig, OutputErrorPolicy, DEFAULT_CONFIG_PATH};

/// Writes a thank-you letter to every event attendee and reports when
/// people register.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) TOML configuration. Defaults to event_manager.toml
    /// in the working directory when that file exists.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// (file path) The attendee roster CSV. Overrides `roster_path`.
    #[arg(short, long)]
    pub roster: Option<PathBuf>,

    /// (file path) The letter template. Overrides `template_path`.
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// (directory) Where thanks_<id>.html files are written. Overrides `output_dir`.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// (abort or skip) What to do when a letter cannot be written.
    #[arg(long, value_parser = parse_policy)]
    pub on_output_error: Option<OutputErrorPolicy>,

    /// Do not contact the Civic Information API; every letter gets the
    /// fallback message.
    #[arg(long)]
    pub offline: bool,

    /// If passed as an argument, will turn on debug logging with timestamps.
    #[arg(long)]
    pub verbose: bool,
}

fn parse_policy(s: &str) -> Result<OutputErrorPolicy, ConfigError> {
    s.parse()
}

impl Args {
    /// Load the configuration file and apply command line overrides.
    pub fn resolve_config(&self) -> Result<EventConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => EventConfig::load(path, true)?,
            None => EventConfig::load(PathBuf::from(DEFAULT_CONFIG_PATH).as_path(), false)?,
        };

        if let Some(roster) = &self.roster {
            config.roster_path = roster.clone();
        }
        if let Some(template) = &self.template {
            config.template_path = template.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(policy) = self.on_output_error {
            config.on_output_error = policy;
        }
        if self.verbose {
            config.log.level = "debug".to_string();
            config.log.timestamps = true;
        }
        Ok(config)
    }
}
