use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::models::{PlayerBans, PlayerElo, PlayerProfile, PlayerStats};
use crate::stats::{CacheOutcome, Lookup, PlayerSummary};

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Simple confirmation body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Player lookups
// ============================================================================

/// Steam profile summary
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub steam_id: String,
    pub persona_name: String,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    pub country_code: Option<String>,
    pub visibility: i32,
    /// True when served from the cache (fresh or stale)
    pub cached: bool,
    /// True when upstream failed and a stale cache row was served
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

impl From<Lookup<PlayerProfile>> for ProfileResponse {
    fn from(lookup: Lookup<PlayerProfile>) -> Self {
        let (cached, stale) = flags(lookup.outcome);
        let row = lookup.row;
        Self {
            steam_id: row.steam_id,
            persona_name: row.persona_name,
            avatar_url: row.avatar_url,
            profile_url: row.profile_url,
            country_code: row.country_code,
            visibility: row.visibility,
            cached,
            stale,
            fetched_at: row.fetched_at,
        }
    }
}

/// CSGO lifetime stats with weapon and map breakdown tables
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub steam_id: String,
    pub total_kills: i64,
    pub total_deaths: i64,
    pub accuracy: f64,
    pub headshot_pct: f64,
    /// Array of per-weapon rows (see WeaponStat)
    #[schema(value_type = Object)]
    pub weapons: serde_json::Value,
    /// Array of per-map rows (see MapStat)
    #[schema(value_type = Object)]
    pub maps: serde_json::Value,
    pub cached: bool,
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

impl From<Lookup<PlayerStats>> for StatsResponse {
    fn from(lookup: Lookup<PlayerStats>) -> Self {
        let (cached, stale) = flags(lookup.outcome);
        let row = lookup.row;
        Self {
            steam_id: row.steam_id,
            total_kills: row.total_kills,
            total_deaths: row.total_deaths,
            accuracy: row.accuracy,
            headshot_pct: row.headshot_pct,
            weapons: row.weapons,
            maps: row.maps,
            cached,
            stale,
            fetched_at: row.fetched_at,
        }
    }
}

/// FACEIT elo and skill level
#[derive(Debug, Serialize, ToSchema)]
pub struct EloResponse {
    pub steam_id: String,
    pub faceit_id: String,
    pub nickname: String,
    pub elo: i32,
    pub skill_level: i32,
    pub region: Option<String>,
    pub cached: bool,
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

impl From<Lookup<PlayerElo>> for EloResponse {
    fn from(lookup: Lookup<PlayerElo>) -> Self {
        let (cached, stale) = flags(lookup.outcome);
        let row = lookup.row;
        Self {
            steam_id: row.steam_id,
            faceit_id: row.faceit_id,
            nickname: row.nickname,
            elo: row.elo,
            skill_level: row.skill_level,
            region: row.region,
            cached,
            stale,
            fetched_at: row.fetched_at,
        }
    }
}

/// Steam ban record
#[derive(Debug, Serialize, ToSchema)]
pub struct BansResponse {
    pub steam_id: String,
    pub vac_banned: bool,
    pub vac_count: i32,
    pub game_ban_count: i32,
    pub community_banned: bool,
    pub economy_ban: String,
    pub days_since_last_ban: i32,
    pub cached: bool,
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

impl From<Lookup<PlayerBans>> for BansResponse {
    fn from(lookup: Lookup<PlayerBans>) -> Self {
        let (cached, stale) = flags(lookup.outcome);
        let row = lookup.row;
        Self {
            steam_id: row.steam_id,
            vac_banned: row.vac_banned,
            vac_count: row.vac_count,
            game_ban_count: row.game_ban_count,
            community_banned: row.community_banned,
            economy_ban: row.economy_ban,
            days_since_last_ban: row.days_since_last_ban,
            cached,
            stale,
            fetched_at: row.fetched_at,
        }
    }
}

/// Combined player summary; parts a provider could not supply are null
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummaryResponse {
    pub steam_id: String,
    pub profile: Option<ProfileResponse>,
    pub stats: Option<StatsResponse>,
    pub elo: Option<EloResponse>,
    pub bans: Option<BansResponse>,
}

impl PlayerSummaryResponse {
    pub fn from_summary(steam_id: String, summary: PlayerSummary) -> Self {
        Self {
            steam_id,
            profile: summary.profile.map(ProfileResponse::from),
            stats: summary.stats.map(StatsResponse::from),
            elo: summary.elo.map(EloResponse::from),
            bans: summary.bans.map(BansResponse::from),
        }
    }
}

fn flags(outcome: CacheOutcome) -> (bool, bool) {
    match outcome {
        CacheOutcome::Fresh => (true, false),
        CacheOutcome::Refreshed => (false, false),
        CacheOutcome::Stale => (true, true),
    }
}

// ============================================================================
// Admin
// ============================================================================

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated admin identity
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSessionResponse {
    pub admin_id: i64,
    pub username: String,
}

/// Request to issue a new API token
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTokenRequest {
    /// Label identifying the consumer (1-64 characters)
    pub label: String,
}

/// One page of audit log rows
#[derive(Debug, Serialize, ToSchema)]
pub struct LogPageResponse {
    pub entries: Vec<crate::database::models::RequestLog>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}
