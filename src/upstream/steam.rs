//! Steam Web API client: player summaries, ban records, and CSGO
//! per-game stats reshaped into weapon and map tables.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::UpstreamError;
use crate::database::models::{NewPlayerBans, NewPlayerProfile, NewPlayerStats};

const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// CSGO app id on Steam
const CSGO_APP_ID: u32 = 730;

/// Client for the Steam Web API
#[derive(Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SteamClient {
    pub fn new(api_key: String) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Override the API base URL (tests point this at a mock server)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch the player's profile summary (GetPlayerSummaries v2)
    pub async fn player_summary(&self, steam_id: &str) -> Result<NewPlayerProfile, UpstreamError> {
        let url = format!("{}/ISteamUser/GetPlayerSummaries/v2/", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("steamids", steam_id)])
            .send()
            .await?;

        let body: SummariesEnvelope = check_status(response)?.json().await?;

        let player = body
            .response
            .players
            .into_iter()
            .next()
            .ok_or(UpstreamError::NotFound)?;

        Ok(NewPlayerProfile {
            steam_id: player.steamid,
            persona_name: player.personaname,
            avatar_url: player.avatarfull,
            profile_url: player.profileurl,
            country_code: player.loccountrycode,
            visibility: player.communityvisibilitystate,
        })
    }

    /// Fetch the player's ban record (GetPlayerBans v1)
    pub async fn player_bans(&self, steam_id: &str) -> Result<NewPlayerBans, UpstreamError> {
        let url = format!("{}/ISteamUser/GetPlayerBans/v1/", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("steamids", steam_id)])
            .send()
            .await?;

        let body: BansEnvelope = check_status(response)?.json().await?;

        let record = body
            .players
            .into_iter()
            .next()
            .ok_or(UpstreamError::NotFound)?;

        Ok(NewPlayerBans {
            steam_id: record.steam_id,
            vac_banned: record.vac_banned,
            vac_count: record.number_of_vac_bans,
            game_ban_count: record.number_of_game_bans,
            community_banned: record.community_banned,
            economy_ban: record.economy_ban,
            days_since_last_ban: record.days_since_last_ban,
        })
    }

    /// Fetch CSGO lifetime stats (GetUserStatsForGame v2) and reshape the
    /// flat stat list into weapon and map breakdown tables
    pub async fn player_game_stats(&self, steam_id: &str) -> Result<NewPlayerStats, UpstreamError> {
        let url = format!("{}/ISteamUserStats/GetUserStatsForGame/v2/", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", steam_id),
                ("appid", &CSGO_APP_ID.to_string()),
            ])
            .send()
            .await?;

        let body: GameStatsEnvelope = check_status(response)?.json().await?;

        reshape_stats(steam_id, body.playerstats.stats)
    }
}

/// Map a non-success status: 400/403/404 mean the player (or their stats)
/// is unavailable, anything else is a provider failure. Steam answers 500
/// on private profiles for the stats endpoint, which callers treat like a
/// transient failure and fall back to cached rows.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status.as_u16() {
        400 | 403 | 404 => Err(UpstreamError::NotFound),
        code => Err(UpstreamError::Status(code)),
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SummariesEnvelope {
    response: SummariesResponse,
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
    #[serde(default)]
    players: Vec<RawPlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct RawPlayerSummary {
    steamid: String,
    personaname: String,
    avatarfull: Option<String>,
    profileurl: Option<String>,
    loccountrycode: Option<String>,
    communityvisibilitystate: i32,
}

#[derive(Debug, Deserialize)]
struct BansEnvelope {
    #[serde(default)]
    players: Vec<RawPlayerBans>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPlayerBans {
    #[serde(rename = "SteamId")]
    steam_id: String,
    community_banned: bool,
    #[serde(rename = "VACBanned")]
    vac_banned: bool,
    #[serde(rename = "NumberOfVACBans")]
    number_of_vac_bans: i32,
    days_since_last_ban: i32,
    number_of_game_bans: i32,
    economy_ban: String,
}

#[derive(Debug, Deserialize)]
struct GameStatsEnvelope {
    playerstats: RawGameStats,
}

#[derive(Debug, Deserialize)]
struct RawGameStats {
    #[serde(default)]
    stats: Vec<RawStat>,
}

#[derive(Debug, Deserialize)]
struct RawStat {
    name: String,
    value: i64,
}

// ============================================================================
// Reshaping
// ============================================================================

/// Per-weapon row in the stats breakdown table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeaponStat {
    pub weapon: String,
    pub kills: i64,
    pub shots: i64,
    pub hits: i64,
    /// Hits / shots, in [0, 1]
    pub accuracy: f64,
}

/// Per-map row in the stats breakdown table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapStat {
    pub map: String,
    pub rounds: i64,
    pub wins: i64,
    /// Wins / rounds, in [0, 1]
    pub win_pct: f64,
}

/// Reshape the flat `total_*` stat list into headline totals plus weapon
/// and map tables.
///
/// Weapons are recognised by a `total_kills_{w}` entry that also has a
/// matching `total_shots_{w}`, which filters out pseudo-kill counters like
/// `total_kills_headshot`. Maps come from `total_rounds_map_{m}`.
fn reshape_stats(steam_id: &str, stats: Vec<RawStat>) -> Result<NewPlayerStats, UpstreamError> {
    if stats.is_empty() {
        return Err(UpstreamError::NotFound);
    }

    let by_name: HashMap<String, i64> = stats.into_iter().map(|s| (s.name, s.value)).collect();

    let total_kills = *by_name.get("total_kills").unwrap_or(&0);
    let total_deaths = *by_name.get("total_deaths").unwrap_or(&0);
    let shots_fired = *by_name.get("total_shots_fired").unwrap_or(&0);
    let shots_hit = *by_name.get("total_shots_hit").unwrap_or(&0);
    let headshot_kills = *by_name.get("total_kills_headshot").unwrap_or(&0);

    let mut weapons: Vec<WeaponStat> = by_name
        .iter()
        .filter_map(|(name, &kills)| {
            let weapon = name.strip_prefix("total_kills_")?;
            let shots = *by_name.get(&format!("total_shots_{}", weapon))?;
            let hits = *by_name.get(&format!("total_hits_{}", weapon)).unwrap_or(&0);
            Some(WeaponStat {
                weapon: weapon.to_string(),
                kills,
                shots,
                hits,
                accuracy: ratio(hits, shots),
            })
        })
        .collect();
    weapons.sort_by(|a, b| b.kills.cmp(&a.kills));

    let mut maps: Vec<MapStat> = by_name
        .iter()
        .filter_map(|(name, &rounds)| {
            let map = name.strip_prefix("total_rounds_map_")?;
            let wins = *by_name.get(&format!("total_wins_map_{}", map)).unwrap_or(&0);
            Some(MapStat {
                map: map.to_string(),
                rounds,
                wins,
                win_pct: ratio(wins, rounds),
            })
        })
        .collect();
    maps.sort_by(|a, b| b.rounds.cmp(&a.rounds));

    Ok(NewPlayerStats {
        steam_id: steam_id.to_string(),
        total_kills,
        total_deaths,
        accuracy: ratio(shots_hit, shots_fired),
        headshot_pct: ratio(headshot_kills, total_kills),
        weapons: serde_json::to_value(&weapons)
            .map_err(|e| UpstreamError::Payload(e.to_string()))?,
        maps: serde_json::to_value(&maps).map_err(|e| UpstreamError::Payload(e.to_string()))?,
    })
}

fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stat(name: &str, value: i64) -> RawStat {
        RawStat {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_reshape_builds_weapon_and_map_tables() {
        let stats = vec![
            stat("total_kills", 1000),
            stat("total_deaths", 800),
            stat("total_shots_fired", 5000),
            stat("total_shots_hit", 1250),
            stat("total_kills_headshot", 400),
            stat("total_kills_ak47", 300),
            stat("total_shots_ak47", 1200),
            stat("total_hits_ak47", 360),
            stat("total_kills_awp", 150),
            stat("total_shots_awp", 300),
            stat("total_hits_awp", 180),
            stat("total_rounds_map_de_dust2", 500),
            stat("total_wins_map_de_dust2", 260),
        ];

        let reshaped = reshape_stats("76561198000000001", stats).unwrap();
        assert_eq!(reshaped.total_kills, 1000);
        assert_eq!(reshaped.accuracy, 0.25);
        assert_eq!(reshaped.headshot_pct, 0.4);

        let weapons: Vec<WeaponStat> = serde_json::from_value(reshaped.weapons).unwrap();
        // Sorted by kills, pseudo-counters like total_kills_headshot excluded
        assert_eq!(weapons.len(), 2);
        assert_eq!(weapons[0].weapon, "ak47");
        assert_eq!(weapons[0].accuracy, 0.3);
        assert_eq!(weapons[1].weapon, "awp");

        let maps: Vec<MapStat> = serde_json::from_value(reshaped.maps).unwrap();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].map, "de_dust2");
        assert_eq!(maps[0].wins, 260);
        assert_eq!(maps[0].win_pct, 0.52);
    }

    #[test]
    fn test_reshape_empty_stats_is_not_found() {
        assert!(matches!(
            reshape_stats("76561198000000001", vec![]),
            Err(UpstreamError::NotFound)
        ));
    }

    #[test]
    fn test_ratio_guards_division_by_zero() {
        assert_eq!(ratio(5, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[tokio::test]
    async fn test_player_summary_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v2/"))
            .and(query_param("steamids", "76561198000000001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "players": [{
                        "steamid": "76561198000000001",
                        "personaname": "s1mple",
                        "avatarfull": "https://avatars.example/full.jpg",
                        "profileurl": "https://steamcommunity.com/id/s1mple/",
                        "loccountrycode": "UA",
                        "communityvisibilitystate": 3
                    }]
                }
            })))
            .mount(&server)
            .await;

        let client = SteamClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let profile = client.player_summary("76561198000000001").await.unwrap();
        assert_eq!(profile.persona_name, "s1mple");
        assert_eq!(profile.country_code.as_deref(), Some("UA"));
        assert_eq!(profile.visibility, 3);
    }

    #[tokio::test]
    async fn test_player_summary_empty_list_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerSummaries/v2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": { "players": [] }
            })))
            .mount(&server)
            .await;

        let client = SteamClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let result = client.player_summary("76561198000000001").await;
        assert!(matches!(result, Err(UpstreamError::NotFound)));
    }

    #[tokio::test]
    async fn test_player_bans_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ISteamUser/GetPlayerBans/v1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "players": [{
                    "SteamId": "76561198000000001",
                    "CommunityBanned": false,
                    "VACBanned": true,
                    "NumberOfVACBans": 1,
                    "DaysSinceLastBan": 250,
                    "NumberOfGameBans": 0,
                    "EconomyBan": "none"
                }]
            })))
            .mount(&server)
            .await;

        let client = SteamClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let bans = client.player_bans("76561198000000001").await.unwrap();
        assert!(bans.vac_banned);
        assert_eq!(bans.vac_count, 1);
        assert_eq!(bans.days_since_last_ban, 250);
        assert_eq!(bans.economy_ban, "none");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ISteamUserStats/GetUserStatsForGame/v2/"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = SteamClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let result = client.player_game_stats("76561198000000001").await;
        assert!(matches!(result, Err(UpstreamError::Status(502))));
    }
}
