use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::error::ApiError;
use super::responses::*;
use crate::database::DatabasePool;
use crate::stats::StatsService;

/// Shared state for the public player endpoints
pub type PlayerState = Arc<StatsService>;

/// Shared state for the health endpoints
#[derive(Clone)]
pub struct HealthState {
    pub pool: DatabasePool,
}

// ============================================================================
// Health
// ============================================================================

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// Health check including a database pool probe
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn api_health(State(state): State<HealthState>) -> impl IntoResponse {
    match state.pool.get() {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "database": "up",
                "timestamp": Utc::now().to_rfc3339()
            })),
        ),
        Err(e) => {
            tracing::error!("Health check database probe failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "database": "down",
                    "timestamp": Utc::now().to_rfc3339()
                })),
            )
        }
    }
}

// ============================================================================
// Player lookups
// ============================================================================

/// Get a player's Steam profile summary
#[utoipa::path(
    get,
    path = "/api/v1/players/{steam_id}/profile",
    tag = "Players",
    params(
        ("steam_id" = String, Path, description = "SteamID64 (17 digits)")
    ),
    responses(
        (status = 200, description = "Profile summary", body = ProfileResponse),
        (status = 400, description = "Invalid SteamID64", body = ErrorResponse),
        (status = 401, description = "Missing or unknown API key", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 502, description = "Upstream failure with no cached row", body = ErrorResponse)
    )
)]
pub async fn get_player_profile(
    State(service): State<PlayerState>,
    Path(steam_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let lookup = service.profile(&steam_id).await?;
    Ok(Json(ProfileResponse::from(lookup)))
}

/// Get a player's CSGO lifetime stats with weapon and map breakdowns
#[utoipa::path(
    get,
    path = "/api/v1/players/{steam_id}/stats",
    tag = "Players",
    params(
        ("steam_id" = String, Path, description = "SteamID64 (17 digits)")
    ),
    responses(
        (status = 200, description = "Lifetime stats", body = StatsResponse),
        (status = 400, description = "Invalid SteamID64", body = ErrorResponse),
        (status = 401, description = "Missing or unknown API key", body = ErrorResponse),
        (status = 404, description = "Player not found or stats hidden", body = ErrorResponse),
        (status = 502, description = "Upstream failure with no cached row", body = ErrorResponse)
    )
)]
pub async fn get_player_stats(
    State(service): State<PlayerState>,
    Path(steam_id): Path<String>,
) -> Result<Json<StatsResponse>, ApiError> {
    let lookup = service.stats(&steam_id).await?;
    Ok(Json(StatsResponse::from(lookup)))
}

/// Get a player's FACEIT elo and skill level
#[utoipa::path(
    get,
    path = "/api/v1/players/{steam_id}/elo",
    tag = "Players",
    params(
        ("steam_id" = String, Path, description = "SteamID64 (17 digits)")
    ),
    responses(
        (status = 200, description = "FACEIT elo entry", body = EloResponse),
        (status = 400, description = "Invalid SteamID64", body = ErrorResponse),
        (status = 401, description = "Missing or unknown API key", body = ErrorResponse),
        (status = 404, description = "No FACEIT account for this Steam ID", body = ErrorResponse),
        (status = 502, description = "Upstream failure with no cached row", body = ErrorResponse)
    )
)]
pub async fn get_player_elo(
    State(service): State<PlayerState>,
    Path(steam_id): Path<String>,
) -> Result<Json<EloResponse>, ApiError> {
    let lookup = service.elo(&steam_id).await?;
    Ok(Json(EloResponse::from(lookup)))
}

/// Get a player's Steam ban record
#[utoipa::path(
    get,
    path = "/api/v1/players/{steam_id}/bans",
    tag = "Players",
    params(
        ("steam_id" = String, Path, description = "SteamID64 (17 digits)")
    ),
    responses(
        (status = 200, description = "Ban record", body = BansResponse),
        (status = 400, description = "Invalid SteamID64", body = ErrorResponse),
        (status = 401, description = "Missing or unknown API key", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 502, description = "Upstream failure with no cached row", body = ErrorResponse)
    )
)]
pub async fn get_player_bans(
    State(service): State<PlayerState>,
    Path(steam_id): Path<String>,
) -> Result<Json<BansResponse>, ApiError> {
    let lookup = service.bans(&steam_id).await?;
    Ok(Json(BansResponse::from(lookup)))
}

/// Get a combined player summary across all lookup kinds
#[utoipa::path(
    get,
    path = "/api/v1/players/{steam_id}",
    tag = "Players",
    params(
        ("steam_id" = String, Path, description = "SteamID64 (17 digits)")
    ),
    responses(
        (status = 200, description = "Combined summary; unavailable parts are null", body = PlayerSummaryResponse),
        (status = 400, description = "Invalid SteamID64", body = ErrorResponse),
        (status = 401, description = "Missing or unknown API key", body = ErrorResponse)
    )
)]
pub async fn get_player_summary(
    State(service): State<PlayerState>,
    Path(steam_id): Path<String>,
) -> Result<Json<PlayerSummaryResponse>, ApiError> {
    let summary = service.summary(&steam_id).await?;
    Ok(Json(PlayerSummaryResponse::from_summary(steam_id, summary)))
}
