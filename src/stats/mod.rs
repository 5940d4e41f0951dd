/// Player statistics service
///
/// Owns the cache-aside flow shared by every lookup kind: consult the
/// cache table, serve fresh rows, refresh stale or missing ones from the
/// upstream providers, and fall back to stale rows when a provider is
/// down. Route handlers stay thin.
pub mod service;

pub use service::{
    CacheOutcome, CacheTtls, Lookup, PlayerSummary, StatsError, StatsService,
};
