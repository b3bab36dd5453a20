mod args;

use std::process::ExitCode;

use clap::Parser;

use event_manager::batch::{BatchOutcome, run_batch};
use event_manager::logging::{init_logger, targets};

use crate::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logger(
        config.log.level_filter(),
        config.log.file.as_deref(),
        config.log.timestamps,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    println!("Event Manager Initialized!");

    match run_batch(&config, args.offline) {
        Ok(BatchOutcome::InputNotFound(path)) => {
            log::debug!(target: targets::SYSTEM, "missing input {}", path.display());
            println!("File not found");
            ExitCode::FAILURE
        }
        Ok(BatchOutcome::Completed { peaks, .. }) => {
            match peaks {
                Some(report) => {
                    println!("{}", report.hours_line());
                    println!("{}", report.days_line());
                }
                None => log::warn!(
                    target: targets::ANALYSIS,
                    "roster had no attendees; skipping peak registration analysis"
                ),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!(target: targets::SYSTEM, "{}", e);
            ExitCode::FAILURE
        }
    }
}
