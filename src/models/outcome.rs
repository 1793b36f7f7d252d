use crate::models::MediaType;
use crate::services::cleaning::CleanSummary;
use camino::Utf8PathBuf;
use std::time::Instant;
use thiserror::Error;

/// What the download client reported when asked about active transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityStatus {
    Idle,
    Active(usize),
    ProbeFailed(String),
}

/// Why the activity gate refused to let a run touch any files
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    #[error("There are still live torrents, aborting")]
    TorrentsActive,

    #[error("Could not query torrent activity: {0}")]
    ProbeError(String),
}

/// Result of one media type's stage in a run.
#[derive(Debug, Clone)]
pub enum CleanupOutcome {
    Skipped(AbortReason),
    Completed(CleanSummary),
    Failed(String),
}

/// One entry of the dispatcher's ordered result.
///
/// `root` and `started_at` are `None` for stages the gate skipped.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub media_type: MediaType,
    pub root: Option<Utf8PathBuf>,
    pub started_at: Option<Instant>,
    pub outcome: CleanupOutcome,
}
