/// Upstream relay clients for the third-party esports APIs
///
/// The service never stores provider credentials per request; each client
/// is constructed once at startup with its API key and reused.
pub mod error;
pub mod faceit;
pub mod steam;

pub use error::UpstreamError;
pub use faceit::FaceitClient;
pub use steam::{MapStat, SteamClient, WeaponStat};

use crate::database::models::{NewPlayerBans, NewPlayerElo, NewPlayerProfile, NewPlayerStats};

/// Provider-facing contract consumed by the cache service
///
/// The cache service depends on this trait rather than the concrete
/// clients, so tests can swap in canned sources.
#[async_trait::async_trait]
pub trait PlayerDataSource: Send + Sync {
    async fn fetch_profile(&self, steam_id: &str) -> Result<NewPlayerProfile, UpstreamError>;
    async fn fetch_stats(&self, steam_id: &str) -> Result<NewPlayerStats, UpstreamError>;
    async fn fetch_elo(&self, steam_id: &str) -> Result<NewPlayerElo, UpstreamError>;
    async fn fetch_bans(&self, steam_id: &str) -> Result<NewPlayerBans, UpstreamError>;
}

/// The production data source: Steam for profile/stats/bans, FACEIT for elo
pub struct UpstreamClients {
    steam: SteamClient,
    faceit: FaceitClient,
}

impl UpstreamClients {
    pub fn new(steam: SteamClient, faceit: FaceitClient) -> Self {
        Self { steam, faceit }
    }
}

#[async_trait::async_trait]
impl PlayerDataSource for UpstreamClients {
    async fn fetch_profile(&self, steam_id: &str) -> Result<NewPlayerProfile, UpstreamError> {
        self.steam.player_summary(steam_id).await
    }

    async fn fetch_stats(&self, steam_id: &str) -> Result<NewPlayerStats, UpstreamError> {
        self.steam.player_game_stats(steam_id).await
    }

    async fn fetch_elo(&self, steam_id: &str) -> Result<NewPlayerElo, UpstreamError> {
        self.faceit.player_entry(steam_id).await
    }

    async fn fetch_bans(&self, steam_id: &str) -> Result<NewPlayerBans, UpstreamError> {
        self.steam.player_bans(steam_id).await
    }
}
