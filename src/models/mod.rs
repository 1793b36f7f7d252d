//! Data models for a cleanup run.
//!
//! - [`RunOptions`]: immutable record of what the operator asked for
//! - [`MediaType`]: the two library kinds, each with its own root and cleaner
//! - [`ActivityStatus`]: result of asking the download client whether it is busy
//! - [`CleanupOutcome`] / [`StageReport`]: per media type result of a run
//!
//! `RunOptions` is built once from the command line and passed by reference into
//! every component; nothing here is global.

pub mod options;
pub mod outcome;

pub use options::{MediaType, PathSource, RunOptions, Verbosity};
pub use outcome::{AbortReason, ActivityStatus, CleanupOutcome, StageReport};
