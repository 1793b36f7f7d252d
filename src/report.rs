// Run report
//
// Folds the dispatcher's stage reports into log lines and a process exit status.

use crate::models::{CleanupOutcome, StageReport};
use std::process::ExitCode;

/// Exit status when every requested stage completed or was skipped by the gate
pub const EXIT_OK: u8 = 0;

/// Exit status when at least one cleaner failed
pub const EXIT_STAGE_FAILED: u8 = 1;

/// Exit status for missing or unusable library paths
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Totals over one run's stages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files_changed: usize,
    pub item_errors: usize,
}

impl RunReport {
    pub fn from_stages(stages: &[StageReport]) -> Self {
        let mut report = Self::default();
        for stage in stages {
            match &stage.outcome {
                CleanupOutcome::Completed(summary) => {
                    report.completed += 1;
                    report.files_changed += summary.actions.len();
                    report.item_errors += summary.errors.len();
                }
                CleanupOutcome::Skipped(_) => report.skipped += 1,
                CleanupOutcome::Failed(_) => report.failed += 1,
            }
        }
        report
    }

    /// Emit one line per stage and a closing total.
    pub fn log(&self, stages: &[StageReport]) {
        for stage in stages {
            match &stage.outcome {
                CleanupOutcome::Completed(summary) => {
                    tracing::info!("Finished {} cleanup: {}", stage.media_type, summary.summary());
                    for error in &summary.errors {
                        tracing::error!("{}: {}", error.path, error.message);
                    }
                }
                CleanupOutcome::Skipped(reason) => {
                    tracing::error!("Skipped {} cleanup: {}", stage.media_type, reason);
                }
                CleanupOutcome::Failed(cause) => {
                    tracing::error!("{} cleanup failed: {}", stage.media_type, cause);
                }
            }
        }

        tracing::debug!(
            "Run totals - completed: {}, skipped: {}, failed: {}, files: {}, item errors: {}",
            self.completed,
            self.skipped,
            self.failed,
            self.files_changed,
            self.item_errors
        );
    }

    /// Process exit status for this run
    pub fn exit_status(&self) -> u8 {
        if self.failed > 0 {
            EXIT_STAGE_FAILED
        } else {
            EXIT_OK
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbortReason, MediaType};
    use crate::services::cleaning::{CleanAction, CleanSummary};
    use camino::Utf8PathBuf;

    fn stage(media_type: MediaType, outcome: CleanupOutcome) -> StageReport {
        StageReport {
            media_type,
            root: None,
            started_at: None,
            outcome,
        }
    }

    #[test]
    fn test_counts() {
        let summary = CleanSummary {
            actions: vec![CleanAction {
                source: Utf8PathBuf::from("/a"),
                destination: Utf8PathBuf::from("/b"),
                applied: true,
            }],
            ..Default::default()
        };
        let stages = vec![
            stage(MediaType::Movie, CleanupOutcome::Completed(summary)),
            stage(MediaType::TvSeries, CleanupOutcome::Failed("boom".to_string())),
        ];

        let report = RunReport::from_stages(&stages);
        assert_eq!(report.completed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.files_changed, 1);
        assert_eq!(report.exit_status(), EXIT_STAGE_FAILED);
    }

    #[test]
    fn test_gate_skip_is_not_a_failure() {
        let stages = vec![
            stage(MediaType::Movie, CleanupOutcome::Skipped(AbortReason::TorrentsActive)),
            stage(
                MediaType::TvSeries,
                CleanupOutcome::Skipped(AbortReason::ProbeError("offline".to_string())),
            ),
        ];

        let report = RunReport::from_stages(&stages);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.exit_status(), EXIT_OK);
    }

    #[test]
    fn test_empty_run() {
        let report = RunReport::from_stages(&[]);
        assert_eq!(report, RunReport::default());
        assert_eq!(report.exit_status(), EXIT_OK);
    }
}
