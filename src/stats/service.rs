use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::database::models::{PlayerBans, PlayerElo, PlayerProfile, PlayerStats};
use crate::database::repositories::PlayerCacheRepository;
use crate::database::DatabaseError;
use crate::upstream::{PlayerDataSource, UpstreamError};
use crate::utils::validation;

/// Per-kind cache TTLs
///
/// A row aged exactly the TTL is already stale (exclusive boundary).
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub profile: Duration,
    pub stats: Duration,
    pub elo: Duration,
    pub bans: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            profile: Duration::hours(1),
            stats: Duration::minutes(30),
            elo: Duration::minutes(10),
            bans: Duration::hours(24),
        }
    }
}

impl CacheTtls {
    /// Read TTL overrides from the environment (seconds), keeping the
    /// defaults where a variable is unset or unparseable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            profile: env_secs("CACHE_TTL_PROFILE_SECS").unwrap_or(defaults.profile),
            stats: env_secs("CACHE_TTL_STATS_SECS").unwrap_or(defaults.stats),
            elo: env_secs("CACHE_TTL_ELO_SECS").unwrap_or(defaults.elo),
            bans: env_secs("CACHE_TTL_BANS_SECS").unwrap_or(defaults.bans),
        }
    }
}

fn env_secs(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .map(Duration::seconds)
}

/// How a lookup was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from a fresh cache row, upstream untouched
    Fresh,
    /// Fetched from upstream and upserted
    Refreshed,
    /// Upstream failed; served from a stale cache row
    Stale,
}

/// A cache row together with how it was obtained
#[derive(Debug, Clone)]
pub struct Lookup<R> {
    pub row: R,
    pub outcome: CacheOutcome,
}

/// Rows that carry a cache timestamp
pub trait FetchStamped {
    fn fetched_at(&self) -> DateTime<Utc>;
}

impl FetchStamped for PlayerProfile {
    fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl FetchStamped for PlayerStats {
    fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl FetchStamped for PlayerElo {
    fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl FetchStamped for PlayerBans {
    fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Errors from the stats service
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid SteamID64: {0}")]
    InvalidSteamId(String),

    #[error("player not found")]
    PlayerNotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Combined lookup across all four kinds; absent parts are None
#[derive(Debug)]
pub struct PlayerSummary {
    pub profile: Option<Lookup<PlayerProfile>>,
    pub stats: Option<Lookup<PlayerStats>>,
    pub elo: Option<Lookup<PlayerElo>>,
    pub bans: Option<Lookup<PlayerBans>>,
}

/// The shared cache-aside service
pub struct StatsService {
    cache: Arc<dyn PlayerCacheRepository>,
    source: Arc<dyn PlayerDataSource>,
    ttls: CacheTtls,
}

/// Freshness check shared by every lookup kind. Exclusive boundary: a row
/// aged exactly `ttl` is stale.
fn is_fresh(fetched_at: DateTime<Utc>, ttl: Duration) -> bool {
    Utc::now() - fetched_at < ttl
}

impl StatsService {
    pub fn new(
        cache: Arc<dyn PlayerCacheRepository>,
        source: Arc<dyn PlayerDataSource>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            cache,
            source,
            ttls,
        }
    }

    /// Steam profile summary
    pub async fn profile(&self, steam_id: &str) -> Result<Lookup<PlayerProfile>, StatsError> {
        self.validate(steam_id)?;
        self.lookup(
            self.ttls.profile,
            || self.cache.get_profile(steam_id),
            |row| self.cache.upsert_profile(row),
            self.source.fetch_profile(steam_id),
        )
        .await
    }

    /// CSGO lifetime stats with weapon/map breakdown
    pub async fn stats(&self, steam_id: &str) -> Result<Lookup<PlayerStats>, StatsError> {
        self.validate(steam_id)?;
        self.lookup(
            self.ttls.stats,
            || self.cache.get_stats(steam_id),
            |row| self.cache.upsert_stats(row),
            self.source.fetch_stats(steam_id),
        )
        .await
    }

    /// FACEIT elo and skill level
    pub async fn elo(&self, steam_id: &str) -> Result<Lookup<PlayerElo>, StatsError> {
        self.validate(steam_id)?;
        self.lookup(
            self.ttls.elo,
            || self.cache.get_elo(steam_id),
            |row| self.cache.upsert_elo(row),
            self.source.fetch_elo(steam_id),
        )
        .await
    }

    /// Steam ban record
    pub async fn bans(&self, steam_id: &str) -> Result<Lookup<PlayerBans>, StatsError> {
        self.validate(steam_id)?;
        self.lookup(
            self.ttls.bans,
            || self.cache.get_bans(steam_id),
            |row| self.cache.upsert_bans(row),
            self.source.fetch_bans(steam_id),
        )
        .await
    }

    /// Combined summary; each part that fails is reported as absent
    pub async fn summary(&self, steam_id: &str) -> Result<PlayerSummary, StatsError> {
        self.validate(steam_id)?;

        Ok(PlayerSummary {
            profile: part(self.profile(steam_id).await, steam_id, "profile"),
            stats: part(self.stats(steam_id).await, steam_id, "stats"),
            elo: part(self.elo(steam_id).await, steam_id, "elo"),
            bans: part(self.bans(steam_id).await, steam_id, "bans"),
        })
    }

    fn validate(&self, steam_id: &str) -> Result<(), StatsError> {
        if validation::is_valid_steam_id(steam_id) {
            Ok(())
        } else {
            Err(StatsError::InvalidSteamId(steam_id.to_string()))
        }
    }

    /// Cache-aside flow shared by all four kinds:
    /// fresh row -> serve it; stale/missing -> fetch and upsert;
    /// fetch failed with a stale row on hand -> serve the stale row.
    ///
    /// `fetch` is a lazy future and is never polled on a fresh hit.
    async fn lookup<R, N, Fut>(
        &self,
        ttl: Duration,
        read: impl Fn() -> Result<Option<R>, DatabaseError>,
        write: impl FnOnce(N) -> Result<R, DatabaseError>,
        fetch: Fut,
    ) -> Result<Lookup<R>, StatsError>
    where
        R: FetchStamped,
        Fut: Future<Output = Result<N, UpstreamError>>,
    {
        let existing = read()?;

        if let Some(row) = existing {
            if is_fresh(row.fetched_at(), ttl) {
                return Ok(Lookup {
                    row,
                    outcome: CacheOutcome::Fresh,
                });
            }

            match fetch.await {
                Ok(fetched) => Ok(Lookup {
                    row: write(fetched)?,
                    outcome: CacheOutcome::Refreshed,
                }),
                Err(UpstreamError::NotFound) => Err(StatsError::PlayerNotFound),
                Err(e) => {
                    tracing::warn!("Upstream fetch failed, serving stale row: {}", e);
                    Ok(Lookup {
                        row,
                        outcome: CacheOutcome::Stale,
                    })
                }
            }
        } else {
            match fetch.await {
                Ok(fetched) => Ok(Lookup {
                    row: write(fetched)?,
                    outcome: CacheOutcome::Refreshed,
                }),
                Err(e) => Err(e.into()),
            }
        }
    }
}

fn part<R>(result: Result<Lookup<R>, StatsError>, steam_id: &str, kind: &str) -> Option<Lookup<R>> {
    match result {
        Ok(lookup) => Some(lookup),
        Err(StatsError::PlayerNotFound) => None,
        Err(e) => {
            tracing::warn!("Summary part '{}' failed for {}: {}", kind, steam_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{
        NewPlayerBans, NewPlayerElo, NewPlayerProfile, NewPlayerStats,
    };
    use crate::database::repositories::player_cache_repository::StaleCutoffs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const STEAM_ID: &str = "76561198000000001";

    fn profile_row(fetched_at: DateTime<Utc>) -> PlayerProfile {
        PlayerProfile {
            steam_id: STEAM_ID.to_string(),
            persona_name: "cached".to_string(),
            avatar_url: None,
            profile_url: None,
            country_code: None,
            visibility: 3,
            fetched_at,
        }
    }

    fn new_profile(name: &str) -> NewPlayerProfile {
        NewPlayerProfile {
            steam_id: STEAM_ID.to_string(),
            persona_name: name.to_string(),
            avatar_url: None,
            profile_url: None,
            country_code: None,
            visibility: 3,
        }
    }

    /// In-memory cache holding at most one profile row
    #[derive(Default)]
    struct MemoryCache {
        profile: Mutex<Option<PlayerProfile>>,
    }

    impl PlayerCacheRepository for MemoryCache {
        fn get_profile(&self, _: &str) -> Result<Option<PlayerProfile>, DatabaseError> {
            Ok(self.profile.lock().unwrap().clone())
        }

        fn upsert_profile(&self, row: NewPlayerProfile) -> Result<PlayerProfile, DatabaseError> {
            let stored = PlayerProfile {
                steam_id: row.steam_id,
                persona_name: row.persona_name,
                avatar_url: row.avatar_url,
                profile_url: row.profile_url,
                country_code: row.country_code,
                visibility: row.visibility,
                fetched_at: Utc::now(),
            };
            *self.profile.lock().unwrap() = Some(stored.clone());
            Ok(stored)
        }

        fn get_stats(&self, _: &str) -> Result<Option<PlayerStats>, DatabaseError> {
            Ok(None)
        }

        fn upsert_stats(&self, _: NewPlayerStats) -> Result<PlayerStats, DatabaseError> {
            unimplemented!("not exercised")
        }

        fn get_elo(&self, _: &str) -> Result<Option<PlayerElo>, DatabaseError> {
            Ok(None)
        }

        fn upsert_elo(&self, _: NewPlayerElo) -> Result<PlayerElo, DatabaseError> {
            unimplemented!("not exercised")
        }

        fn get_bans(&self, _: &str) -> Result<Option<PlayerBans>, DatabaseError> {
            Ok(None)
        }

        fn upsert_bans(&self, _: NewPlayerBans) -> Result<PlayerBans, DatabaseError> {
            unimplemented!("not exercised")
        }

        fn delete_stale(&self, _: StaleCutoffs) -> Result<usize, DatabaseError> {
            Ok(0)
        }
    }

    /// Data source that counts fetches and answers from a canned result
    struct CannedSource {
        fetches: AtomicUsize,
        fail_with: Option<fn() -> UpstreamError>,
    }

    impl CannedSource {
        fn ok() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(err: fn() -> UpstreamError) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail_with: Some(err),
            }
        }
    }

    #[async_trait::async_trait]
    impl PlayerDataSource for CannedSource {
        async fn fetch_profile(&self, _: &str) -> Result<NewPlayerProfile, UpstreamError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(err) => Err(err()),
                None => Ok(new_profile("fetched")),
            }
        }

        async fn fetch_stats(&self, _: &str) -> Result<NewPlayerStats, UpstreamError> {
            Err(UpstreamError::NotFound)
        }

        async fn fetch_elo(&self, _: &str) -> Result<NewPlayerElo, UpstreamError> {
            Err(UpstreamError::NotFound)
        }

        async fn fetch_bans(&self, _: &str) -> Result<NewPlayerBans, UpstreamError> {
            Err(UpstreamError::NotFound)
        }
    }

    fn service(cache: Arc<MemoryCache>, source: Arc<CannedSource>) -> StatsService {
        StatsService::new(cache, source, CacheTtls::default())
    }

    #[test]
    fn test_freshness_boundary_is_exclusive() {
        let ttl = Duration::minutes(10);
        assert!(is_fresh(Utc::now() - Duration::minutes(9), ttl));
        assert!(!is_fresh(Utc::now() - Duration::minutes(10), ttl));
        assert!(!is_fresh(Utc::now() - Duration::minutes(11), ttl));
    }

    #[tokio::test]
    async fn test_fresh_hit_does_not_touch_upstream() {
        let cache = Arc::new(MemoryCache::default());
        *cache.profile.lock().unwrap() = Some(profile_row(Utc::now()));
        let source = Arc::new(CannedSource::ok());

        let svc = service(cache, source.clone());
        let lookup = svc.profile(STEAM_ID).await.unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Fresh);
        assert_eq!(lookup.row.persona_name, "cached");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_upserts() {
        let cache = Arc::new(MemoryCache::default());
        let source = Arc::new(CannedSource::ok());

        let svc = service(cache.clone(), source.clone());
        let lookup = svc.profile(STEAM_ID).await.unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Refreshed);
        assert_eq!(lookup.row.persona_name, "fetched");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(cache.profile.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stale_row_refreshes() {
        let cache = Arc::new(MemoryCache::default());
        *cache.profile.lock().unwrap() = Some(profile_row(Utc::now() - Duration::hours(2)));
        let source = Arc::new(CannedSource::ok());

        let svc = service(cache, source.clone());
        let lookup = svc.profile(STEAM_ID).await.unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Refreshed);
        assert_eq!(lookup.row.persona_name, "fetched");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_serves_stale_row() {
        let cache = Arc::new(MemoryCache::default());
        *cache.profile.lock().unwrap() = Some(profile_row(Utc::now() - Duration::hours(2)));
        let source = Arc::new(CannedSource::failing(|| UpstreamError::Status(502)));

        let svc = service(cache, source);
        let lookup = svc.profile(STEAM_ID).await.unwrap();

        assert_eq!(lookup.outcome, CacheOutcome::Stale);
        assert_eq!(lookup.row.persona_name, "cached");
    }

    #[tokio::test]
    async fn test_upstream_failure_without_row_is_error() {
        let cache = Arc::new(MemoryCache::default());
        let source = Arc::new(CannedSource::failing(|| UpstreamError::Status(502)));

        let svc = service(cache, source);
        let result = svc.profile(STEAM_ID).await;
        assert!(matches!(result, Err(StatsError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_not_found_is_never_cached() {
        let cache = Arc::new(MemoryCache::default());
        let source = Arc::new(CannedSource::failing(|| UpstreamError::NotFound));

        let svc = service(cache.clone(), source);
        let result = svc.profile(STEAM_ID).await;

        assert!(matches!(result, Err(StatsError::PlayerNotFound)));
        assert!(cache.profile.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_steam_id_rejected_before_fetch() {
        let cache = Arc::new(MemoryCache::default());
        let source = Arc::new(CannedSource::ok());

        let svc = service(cache, source.clone());
        let result = svc.profile("not-a-steam-id").await;

        assert!(matches!(result, Err(StatsError::InvalidSteamId(_))));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summary_reports_missing_parts_as_none() {
        let cache = Arc::new(MemoryCache::default());
        let source = Arc::new(CannedSource::ok());

        let svc = service(cache, source);
        let summary = svc.summary(STEAM_ID).await.unwrap();

        assert!(summary.profile.is_some());
        assert!(summary.stats.is_none());
        assert!(summary.elo.is_none());
        assert!(summary.bans.is_none());
    }
}
