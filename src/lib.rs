// MediaCleaner - scheduled movie and tv-series library cleanup
//
// This is the library crate containing the cleanup pipeline and its data structures.
// The binary crate (main.rs) provides the command line entry point.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigDocument;
pub use models::{ActivityStatus, CleanupOutcome, MediaType, RunOptions, StageReport};
pub use report::RunReport;
pub use services::{CleanupDispatcher, CleanupGate, PathResolver};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
