//! Cached player rows, one table per lookup kind.
//!
//! Every table is keyed by SteamID64 and carries a `fetched_at` column
//! that the cache service compares against the kind's TTL. The `New*`
//! structs omit `fetched_at`; inserts take the database default and
//! upserts reset it explicitly.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cached Steam profile summary (GetPlayerSummaries)
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::player_profiles)]
#[diesel(primary_key(steam_id))]
pub struct PlayerProfile {
    pub steam_id: String,
    pub persona_name: String,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    /// ISO 3166-1 alpha-2 country code, when the profile exposes one
    pub country_code: Option<String>,
    /// Steam community visibility state (1 = private, 3 = public)
    pub visibility: i32,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::database::schema::player_profiles)]
pub struct NewPlayerProfile {
    pub steam_id: String,
    pub persona_name: String,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    pub country_code: Option<String>,
    pub visibility: i32,
}

/// Cached CSGO lifetime stats (GetUserStatsForGame, appid 730)
///
/// Headline totals are promoted to columns; the per-weapon and per-map
/// breakdown tables are stored as JSONB payloads.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::player_stats)]
#[diesel(primary_key(steam_id))]
pub struct PlayerStats {
    pub steam_id: String,
    pub total_kills: i64,
    pub total_deaths: i64,
    /// Shots hit / shots fired, in [0, 1]
    pub accuracy: f64,
    /// Headshot kills / total kills, in [0, 1]
    pub headshot_pct: f64,
    #[schema(value_type = Object)]
    pub weapons: serde_json::Value,
    #[schema(value_type = Object)]
    pub maps: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::database::schema::player_stats)]
pub struct NewPlayerStats {
    pub steam_id: String,
    pub total_kills: i64,
    pub total_deaths: i64,
    pub accuracy: f64,
    pub headshot_pct: f64,
    pub weapons: serde_json::Value,
    pub maps: serde_json::Value,
}

/// Cached FACEIT elo and skill level
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::player_elo)]
#[diesel(primary_key(steam_id))]
pub struct PlayerElo {
    pub steam_id: String,
    pub faceit_id: String,
    pub nickname: String,
    pub elo: i32,
    /// FACEIT skill level, 1-10
    pub skill_level: i32,
    pub region: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::database::schema::player_elo)]
pub struct NewPlayerElo {
    pub steam_id: String,
    pub faceit_id: String,
    pub nickname: String,
    pub elo: i32,
    pub skill_level: i32,
    pub region: Option<String>,
}

/// Cached Steam ban record (GetPlayerBans)
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::player_bans)]
#[diesel(primary_key(steam_id))]
pub struct PlayerBans {
    pub steam_id: String,
    pub vac_banned: bool,
    pub vac_count: i32,
    pub game_ban_count: i32,
    pub community_banned: bool,
    /// Steam economy ban state ("none", "probation", "banned")
    pub economy_ban: String,
    pub days_since_last_ban: i32,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::database::schema::player_bans)]
pub struct NewPlayerBans {
    pub steam_id: String,
    pub vac_banned: bool,
    pub vac_count: i32,
    pub game_ban_count: i32,
    pub community_banned: bool,
    pub economy_ban: String,
    pub days_since_last_ban: i32,
}
