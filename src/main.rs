//! MediaCleaner - scheduled movie and tv-series library cleanup
//!
//! Main entry point for the command line tool.
//!
//! # Execution Flow
//!
//! 1. Parse arguments (clap handles `--version` and usage errors)
//! 2. Answer `--show-flags` / `--show-options` and exit
//! 3. Initialize logging (console, plus rotating files with `--log-dir`)
//! 4. Validate that every requested library has a path source
//! 5. Print the cron banner and run header
//! 6. Run the dispatcher on a single-threaded tokio runtime
//! 7. Report stage outcomes and exit
//!
//! # Exit Status
//!
//! - 0: every requested stage completed, or the activity gate skipped the run
//! - 1: at least one cleaner failed
//! - 2: a requested library has no usable path, or arguments were invalid

use anyhow::Result;
use clap::Parser;
use mediacleaner::cli::{self, Cli};
use mediacleaner::logging::{self, LogSettings};
use mediacleaner::report::{EXIT_CONFIG_ERROR, RunReport};
use mediacleaner::services::{CleanupDispatcher, DelugeProbe, MovieCleaner, PathResolver, TvCleaner};
use mediacleaner::{APP_NAME, VERSION};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_flags {
        println!("{}", cli::flag_listing());
        return Ok(ExitCode::SUCCESS);
    }
    if cli.show_options {
        println!("{}", cli::option_listing());
        return Ok(ExitCode::SUCCESS);
    }

    let options = cli.run_options();

    let _guard = logging::setup_logging(&LogSettings {
        verbosity: options.verbosity,
        color: cli.color,
        log_dir: cli.log_dir.as_deref(),
        log_prefix: APP_NAME,
    })?;

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    if options.requested().is_empty() {
        tracing::warn!("Nothing to clean, see --movie or --tv");
        return Ok(ExitCode::SUCCESS);
    }

    // Report missing paths now rather than after a possibly slow activity check.
    if let Err(e) = PathResolver::resolve_all(&options) {
        tracing::error!("{}", e);
        return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
    }

    if cli.cron {
        tracing::info!("{}", logging::banner());
    }
    tracing::info!("{}", logging::run_header());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let dispatcher = CleanupDispatcher::new(
        Box::new(DelugeProbe::new(cli.deluge_console.clone(), cli.probe_timeout())),
        Box::new(MovieCleaner::new()),
        Box::new(TvCleaner::new()),
    );

    let exit_code = match runtime.block_on(dispatcher.run(&options)) {
        Ok(stages) => {
            let report = RunReport::from_stages(&stages);
            report.log(&stages);
            report.exit_code()
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    };

    if cli.cron {
        tracing::info!("{}", logging::banner());
    }

    Ok(exit_code)
}
