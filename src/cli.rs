//! Command line surface.
//!
//! Parsing only: the result is turned into an immutable [`RunOptions`] before any
//! work starts, plus the presentation settings (color, cron banner, log directory)
//! the binary needs for logging.

use crate::models::{RunOptions, Verbosity};
use crate::services::probe::DEFAULT_CONSOLE;
use camino::Utf8PathBuf;
use clap::Parser;
use std::time::Duration;

/// Boolean flags affecting output and file changes, as printed by `--show-flags`
pub const FLAG_NAMES: &[&str] = &["verbose", "quiet", "color", "safemode"];

/// Everything else, as printed by `--show-options`
pub const OPTION_NAMES: &[&str] = &[
    "version",
    "cron",
    "force",
    "tv",
    "movie",
    "config",
    "movie-dir",
    "tv-dir",
    "probe-timeout",
    "deluge-console",
    "log-dir",
];

/// Cleans and renames media files.
#[derive(Debug, Parser)]
#[command(name = "mediacleaner", version, about = "Cleans and renames media files.")]
pub struct Cli {
    /// Enables verbose mode
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enables quiet mode
    #[arg(short, long)]
    pub quiet: bool,

    /// Enables colored log output
    #[arg(short, long)]
    pub color: bool,

    /// Disables any file changes
    #[arg(short, long)]
    pub safemode: bool,

    /// Enables cron mode with extra log output
    #[arg(short = 'C', long)]
    pub cron: bool,

    /// Force clean and ignore torrent activity
    #[arg(short, long)]
    pub force: bool,

    /// Clean tv-series directory
    #[arg(short, long)]
    pub tv: bool,

    /// Clean movie directory
    #[arg(short, long)]
    pub movie: bool,

    /// Path to movie directory
    #[arg(long, value_name = "PATH")]
    pub movie_dir: Option<Utf8PathBuf>,

    /// Path to tv-series directory
    #[arg(long, value_name = "PATH")]
    pub tv_dir: Option<Utf8PathBuf>,

    /// Path to the yaml file containing media paths
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Seconds to wait for the torrent client before giving up
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub probe_timeout: u64,

    /// Torrent client console program used for the activity check
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_CONSOLE)]
    pub deluge_console: String,

    /// Also write daily rotating log files to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<Utf8PathBuf>,

    #[arg(long, hide = true)]
    pub show_flags: bool,

    #[arg(long, hide = true)]
    pub show_options: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }

    /// Snapshot the run intent
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            clean_movie: self.movie,
            clean_tv: self.tv,
            force: self.force,
            safe_mode: self.safemode,
            verbosity: self.verbosity(),
            movie_dir: self.movie_dir.clone(),
            tv_dir: self.tv_dir.clone(),
            config_path: self.config.clone(),
        }
    }
}

/// `--show-flags` output
pub fn flag_listing() -> String {
    listing(FLAG_NAMES)
}

/// `--show-options` output
pub fn option_listing() -> String {
    listing(OPTION_NAMES)
}

fn listing(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("--{}", name))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mediacleaner").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_listed_names_exist() {
        let mut command = Cli::command();
        command.build();
        let longs: Vec<&str> = command.get_arguments().filter_map(|a| a.get_long()).collect();

        for name in FLAG_NAMES.iter().chain(OPTION_NAMES) {
            assert!(longs.contains(name), "--{} is not a recognized argument", name);
        }
    }

    #[test]
    fn test_every_visible_argument_is_listed() {
        let mut command = Cli::command();
        command.build();

        for arg in command.get_arguments().filter(|a| !a.is_hide_set()) {
            let Some(long) = arg.get_long() else { continue };
            if long == "help" {
                continue;
            }
            assert!(
                FLAG_NAMES.contains(&long) || OPTION_NAMES.contains(&long),
                "--{} missing from listings",
                long
            );
        }
    }

    #[test]
    fn test_listings() {
        assert_eq!(flag_listing(), "--verbose --quiet --color --safemode");
        assert!(option_listing().starts_with("--version --cron --force"));
        assert!(!option_listing().contains("show-"));
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-m", "-t", "-s", "-f", "-C", "-c", "-v"]).unwrap();
        assert!(cli.movie && cli.tv && cli.safemode && cli.force && cli.cron && cli.color);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(parse(&["-v", "-q"]).is_err());
    }

    #[test]
    fn test_run_options_snapshot() {
        let cli = parse(&["--movie", "--movie-dir", "/library/movies", "--config", "media.yaml", "-q"])
            .unwrap();
        let options = cli.run_options();

        assert!(options.clean_movie);
        assert!(!options.clean_tv);
        assert_eq!(options.movie_dir, Some(Utf8PathBuf::from("/library/movies")));
        assert_eq!(options.config_path, Some(Utf8PathBuf::from("media.yaml")));
        assert_eq!(options.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_probe_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.probe_timeout(), Duration::from_secs(30));
        assert_eq!(cli.deluge_console, "deluge-console");
    }

    #[test]
    fn test_version_flag() {
        let err = parse(&["-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
