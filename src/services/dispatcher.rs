use crate::models::{CleanupOutcome, MediaType, RunOptions, StageReport};
use crate::services::cleaning::MediaCleaner;
use crate::services::gate::CleanupGate;
use crate::services::probe::ActivityProbe;
use crate::services::resolver::{PathResolver, ResolveError};
use camino::Utf8Path;
use std::time::Instant;

/// Top-level orchestration of a cleanup run.
///
/// Resolves every requested library root, consults the activity gate, then runs
/// the movie cleaner followed by the tv-series cleaner. Cleaners run strictly one
/// after the other and each at most once per run; the dispatcher itself never
/// touches the filesystem.
pub struct CleanupDispatcher {
    probe: Box<dyn ActivityProbe + Send + Sync>,
    movie_cleaner: Box<dyn MediaCleaner>,
    tv_cleaner: Box<dyn MediaCleaner>,
}

impl CleanupDispatcher {
    pub fn new(
        probe: Box<dyn ActivityProbe + Send + Sync>,
        movie_cleaner: Box<dyn MediaCleaner>,
        tv_cleaner: Box<dyn MediaCleaner>,
    ) -> Self {
        Self {
            probe,
            movie_cleaner,
            tv_cleaner,
        }
    }

    /// Execute one run.
    ///
    /// Path resolution failures abort before the probe is consulted and before any
    /// cleaner is invoked. A gate refusal yields one `Skipped` report per requested
    /// media type. A failing movie cleaner does not prevent the tv-series stage.
    pub async fn run(&self, options: &RunOptions) -> Result<Vec<StageReport>, ResolveError> {
        if options.safe_mode {
            tracing::info!("Safemode enabled, not changing any files");
        } else {
            tracing::info!("Safemode disabled, all changes will be applied");
        }

        let roots = PathResolver::resolve_all(options)?;

        if let Err(reason) = CleanupGate::may_proceed(options, self.probe.as_ref()).await {
            tracing::error!("{}", reason);
            return Ok(roots
                .into_iter()
                .map(|(media_type, _)| StageReport {
                    media_type,
                    root: None,
                    started_at: None,
                    outcome: CleanupOutcome::Skipped(reason.clone()),
                })
                .collect());
        }

        Ok(roots
            .into_iter()
            .map(|(media_type, root)| self.run_stage(media_type, &root, options.safe_mode))
            .collect())
    }

    fn run_stage(&self, media_type: MediaType, root: &Utf8Path, safe_mode: bool) -> StageReport {
        let cleaner = match media_type {
            MediaType::Movie => self.movie_cleaner.as_ref(),
            MediaType::TvSeries => self.tv_cleaner.as_ref(),
        };

        let started_at = Instant::now();
        tracing::info!("Running {} cleanup script on: {}", media_type, root);

        let outcome = match cleaner.clean(root, safe_mode) {
            Ok(summary) => CleanupOutcome::Completed(summary),
            Err(e) => CleanupOutcome::Failed(e.to_string()),
        };

        StageReport {
            media_type,
            root: Some(root.to_path_buf()),
            started_at: Some(started_at),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbortReason, ActivityStatus};
    use crate::services::cleaning::{CleanSummary, CleaningError, MockMediaCleaner};
    use crate::services::probe::MockActivityProbe;
    use camino::Utf8PathBuf;
    use std::time::Duration;

    fn idle_probe() -> MockActivityProbe {
        let mut probe = MockActivityProbe::new();
        probe.expect_probe().times(1).returning(|| ActivityStatus::Idle);
        probe
    }

    fn unused_cleaner() -> MockMediaCleaner {
        let mut cleaner = MockMediaCleaner::new();
        cleaner.expect_clean().never();
        cleaner
    }

    fn dispatcher(
        probe: MockActivityProbe,
        movie: MockMediaCleaner,
        tv: MockMediaCleaner,
    ) -> CleanupDispatcher {
        CleanupDispatcher::new(Box::new(probe), Box::new(movie), Box::new(tv))
    }

    #[tokio::test]
    async fn test_movie_only_idle() {
        let mut movie = MockMediaCleaner::new();
        movie
            .expect_clean()
            .withf(|root, safe_mode| root.as_str() == "/library/movies" && *safe_mode)
            .times(1)
            .returning(|_, _| Ok(CleanSummary::default()));

        let options = RunOptions {
            clean_movie: true,
            safe_mode: true,
            movie_dir: Some(Utf8PathBuf::from("/library/movies")),
            ..Default::default()
        };

        let reports = dispatcher(idle_probe(), movie, unused_cleaner())
            .run(&options)
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].media_type, MediaType::Movie);
        assert!(matches!(reports[0].outcome, CleanupOutcome::Completed(_)));
        assert_eq!(reports[0].root.as_deref(), Some(Utf8Path::new("/library/movies")));
    }

    #[tokio::test]
    async fn test_active_torrents_skip_everything() {
        let mut probe = MockActivityProbe::new();
        probe.expect_probe().times(1).returning(|| ActivityStatus::Active(2));

        let options = RunOptions {
            clean_movie: true,
            clean_tv: true,
            movie_dir: Some(Utf8PathBuf::from("/m")),
            tv_dir: Some(Utf8PathBuf::from("/t")),
            ..Default::default()
        };

        let reports = dispatcher(probe, unused_cleaner(), unused_cleaner())
            .run(&options)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert!(matches!(
                report.outcome,
                CleanupOutcome::Skipped(AbortReason::TorrentsActive)
            ));
            assert!(report.started_at.is_none());
        }
    }

    #[tokio::test]
    async fn test_missing_path_fails_before_probe() {
        let mut probe = MockActivityProbe::new();
        probe.expect_probe().never();

        let options = RunOptions {
            clean_tv: true,
            ..Default::default()
        };

        let result = dispatcher(probe, unused_cleaner(), unused_cleaner())
            .run(&options)
            .await;

        assert_eq!(
            result.unwrap_err(),
            ResolveError::NoPathConfigured(MediaType::TvSeries)
        );
    }

    #[tokio::test]
    async fn test_movie_failure_does_not_block_tv() {
        let mut movie = MockMediaCleaner::new();
        movie
            .expect_clean()
            .times(1)
            .returning(|root, _| Err(CleaningError::RootMissing(root.to_path_buf())));
        let mut tv = MockMediaCleaner::new();
        tv.expect_clean()
            .times(1)
            .returning(|_, _| Ok(CleanSummary::default()));

        let options = RunOptions {
            clean_movie: true,
            clean_tv: true,
            movie_dir: Some(Utf8PathBuf::from("/gone")),
            tv_dir: Some(Utf8PathBuf::from("/t")),
            ..Default::default()
        };

        let reports = dispatcher(idle_probe(), movie, tv).run(&options).await.unwrap();

        assert!(matches!(reports[0].outcome, CleanupOutcome::Failed(ref msg) if msg.contains("/gone")));
        assert!(matches!(reports[1].outcome, CleanupOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_movie_starts_before_tv() {
        let mut movie = MockMediaCleaner::new();
        movie.expect_clean().times(1).returning(|_, _| {
            std::thread::sleep(Duration::from_millis(2));
            Ok(CleanSummary::default())
        });
        let mut tv = MockMediaCleaner::new();
        tv.expect_clean()
            .times(1)
            .returning(|_, _| Ok(CleanSummary::default()));

        let options = RunOptions {
            clean_movie: true,
            clean_tv: true,
            movie_dir: Some(Utf8PathBuf::from("/m")),
            tv_dir: Some(Utf8PathBuf::from("/t")),
            ..Default::default()
        };

        let reports = dispatcher(idle_probe(), movie, tv).run(&options).await.unwrap();

        assert_eq!(reports[0].media_type, MediaType::Movie);
        assert_eq!(reports[1].media_type, MediaType::TvSeries);
        assert!(reports[0].started_at.unwrap() < reports[1].started_at.unwrap());
    }

    #[tokio::test]
    async fn test_force_bypasses_probe() {
        let mut probe = MockActivityProbe::new();
        probe.expect_probe().never();
        let mut tv = MockMediaCleaner::new();
        tv.expect_clean()
            .times(1)
            .returning(|_, _| Ok(CleanSummary::default()));

        let options = RunOptions {
            clean_tv: true,
            force: true,
            tv_dir: Some(Utf8PathBuf::from("/t")),
            ..Default::default()
        };

        let reports = dispatcher(probe, unused_cleaner(), tv).run(&options).await.unwrap();
        assert_eq!(reports.len(), 1);
    }
}
