use crate::models::{AbortReason, ActivityStatus, RunOptions};
use crate::services::probe::ActivityProbe;

/// Decides whether it is safe to touch library files right now.
///
/// Nothing under a library root may be modified while the download client reports
/// active transfers, unless the operator passed `--force`. A probe that cannot give
/// an answer counts as unsafe.
pub struct CleanupGate;

impl CleanupGate {
    /// Returns `Ok` when cleaning may proceed.
    ///
    /// With `force` set the probe is never consulted. Otherwise it is consulted
    /// exactly once.
    pub async fn may_proceed<P>(options: &RunOptions, probe: &P) -> Result<(), AbortReason>
    where
        P: ActivityProbe + Sync + ?Sized,
    {
        if options.force {
            tracing::info!("Force enabled, skipping torrent activity check");
            return Ok(());
        }

        match probe.probe().await {
            ActivityStatus::Idle => {
                tracing::debug!("No active torrents");
                Ok(())
            }
            ActivityStatus::Active(count) => {
                tracing::debug!("{} active torrents", count);
                Err(AbortReason::TorrentsActive)
            }
            ActivityStatus::ProbeFailed(cause) => Err(AbortReason::ProbeError(cause)),
        }
    }
}
