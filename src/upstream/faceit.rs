//! FACEIT Data API client: player entry with CSGO elo and skill level.

use std::time::Duration;

use serde::Deserialize;

use super::error::UpstreamError;
use crate::database::models::NewPlayerElo;

const DEFAULT_BASE_URL: &str = "https://open.faceit.com/data/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the FACEIT Data API
#[derive(Clone)]
pub struct FaceitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FaceitClient {
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

    /// Look up a player by SteamID64 and extract their CSGO elo entry.
    ///
    /// FACEIT answers 404 both for unknown Steam ids and for accounts that
    /// never played CSGO; both surface as `NotFound` and are never cached.
    pub async fn player_entry(&self, steam_id: &str) -> Result<NewPlayerElo, UpstreamError> {
        let url = format!("{}/players", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("game", "csgo"), ("game_player_id", steam_id)])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(UpstreamError::NotFound);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: RawFaceitPlayer = response.json().await?;

        let csgo = body.games.csgo.ok_or(UpstreamError::NotFound)?;

        Ok(NewPlayerElo {
            steam_id: steam_id.to_string(),
            faceit_id: body.player_id,
            nickname: body.nickname,
            elo: csgo.faceit_elo,
            skill_level: csgo.skill_level,
            region: csgo.region,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawFaceitPlayer {
    player_id: String,
    nickname: String,
    #[serde(default)]
    games: RawFaceitGames,
}

#[derive(Debug, Default, Deserialize)]
struct RawFaceitGames {
    csgo: Option<RawFaceitGameEntry>,
}

#[derive(Debug, Deserialize)]
struct RawFaceitGameEntry {
    faceit_elo: i32,
    skill_level: i32,
    region: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_player_entry_parses_csgo_game() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/players"))
            .and(query_param("game", "csgo"))
            .and(query_param("game_player_id", "76561198000000001"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "player_id": "f1ace17-0000-4000-8000-000000000001",
                "nickname": "donk666",
                "games": {
                    "csgo": {
                        "faceit_elo": 2101,
                        "skill_level": 10,
                        "region": "EU"
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = FaceitClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let elo = client.player_entry("76561198000000001").await.unwrap();
        assert_eq!(elo.nickname, "donk666");
        assert_eq!(elo.elo, 2101);
        assert_eq!(elo.skill_level, 10);
        assert_eq!(elo.region.as_deref(), Some("EU"));
    }

    #[tokio::test]
    async fn test_unknown_player_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/players"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = FaceitClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let result = client.player_entry("76561198000000001").await;
        assert!(matches!(result, Err(UpstreamError::NotFound)));
    }

    #[tokio::test]
    async fn test_account_without_csgo_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/players"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "player_id": "f1ace17-0000-4000-8000-000000000002",
                "nickname": "dota_only",
                "games": {}
            })))
            .mount(&server)
            .await;

        let client = FaceitClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri());

        let result = client.player_entry("76561198000000001").await;
        assert!(matches!(result, Err(UpstreamError::NotFound)));
    }
}
