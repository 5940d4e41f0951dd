use utoipa::OpenApi;

use crate::api::admin_handlers;
use crate::api::player_handlers;
use crate::api::responses::*;
use crate::database::models::{ApiToken, RequestLog};
use crate::upstream::{MapStat, WeaponStat};

/// OpenAPI specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CSGO Stats API",
        version = "1.0.0",
        description = "CSGO player statistics relay over the Steam Web API and FACEIT Data API, with per-kind cache tables and an admin API for tokens and audit logs",
        license(
            name = "MIT"
        )
    ),
    paths(
        player_handlers::health_check,
        player_handlers::api_health,
        player_handlers::get_player_summary,
        player_handlers::get_player_profile,
        player_handlers::get_player_stats,
        player_handlers::get_player_elo,
        player_handlers::get_player_bans,
        admin_handlers::login,
        admin_handlers::logout,
        admin_handlers::current_session,
        admin_handlers::create_token,
        admin_handlers::list_tokens,
        admin_handlers::delete_token,
        admin_handlers::list_logs,
    ),
    components(
        schemas(
            ProfileResponse,
            StatsResponse,
            EloResponse,
            BansResponse,
            PlayerSummaryResponse,
            WeaponStat,
            MapStat,
            LoginRequest,
            AdminSessionResponse,
            CreateTokenRequest,
            ApiToken,
            RequestLog,
            LogPageResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Players", description = "Player lookup endpoints (require X-API-Key)"),
        (name = "Admin", description = "Admin session, token, and audit log endpoints (session cookie)"),
    )
)]
pub struct ApiDoc;
