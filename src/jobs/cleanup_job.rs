use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::database::repositories::{
    LogRepository, PlayerCacheRepository, SessionRepository, StaleCutoffs,
};
use crate::stats::CacheTtls;

/// Maintenance job
///
/// Runs hourly to purge expired sessions, cache rows past their TTL, and
/// audit log rows past the retention window.
pub struct CleanupJob {
    session_repository: Arc<dyn SessionRepository>,
    log_repository: Arc<dyn LogRepository>,
    player_cache_repository: Arc<dyn PlayerCacheRepository>,
    ttls: CacheTtls,
    log_retention_days: i64,
}

impl CleanupJob {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        log_repository: Arc<dyn LogRepository>,
        player_cache_repository: Arc<dyn PlayerCacheRepository>,
        ttls: CacheTtls,
        log_retention_days: i64,
    ) -> Self {
        Self {
            session_repository,
            log_repository,
            player_cache_repository,
            ttls,
            log_retention_days,
        }
    }

    /// Perform one cleanup sweep, returning the total rows removed
    async fn sweep(&self) -> Result<usize, Box<dyn std::error::Error>> {
        tracing::info!("Starting cleanup job");
        let now = Utc::now();

        let sessions = self.session_repository.delete_expired(now)?;

        let cache_rows = self.player_cache_repository.delete_stale(StaleCutoffs {
            profiles: now - self.ttls.profile,
            stats: now - self.ttls.stats,
            elo: now - self.ttls.elo,
            bans: now - self.ttls.bans,
        })?;

        let cutoff = now - Duration::days(self.log_retention_days);
        let log_rows = self.log_repository.delete_older_than(cutoff)?;

        let total = sessions + cache_rows + log_rows;
        tracing::info!(
            "Cleanup completed: {} sessions, {} cache rows, {} log rows removed",
            sessions,
            cache_rows,
            log_rows
        );

        Ok(total)
    }

    /// Register this job with the scheduler
    ///
    /// Schedule: hourly, on the hour (0 0 * * * *)
    pub async fn register(
        self,
        scheduler: &JobScheduler,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let job = Arc::new(self);

        let scheduled = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
            let job = job.clone();

            Box::pin(async move {
                if let Err(e) = job.sweep().await {
                    tracing::error!("Cleanup job failed: {}", e);
                }
            })
        })?;

        scheduler.add(scheduled).await?;

        tracing::info!("Cleanup job registered (runs hourly)");

        Ok(())
    }

    /// Run a sweep immediately (manual trigger)
    pub async fn run_now(&self) -> Result<usize, Box<dyn std::error::Error>> {
        self.sweep().await
    }
}
