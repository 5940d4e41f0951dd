use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{require_admin_session, require_api_key, ApiKeyState};
use crate::database::DatabasePool;
use crate::stats::StatsService;

use super::admin_handlers::{self, AdminState};
use super::openapi::ApiDoc;
use super::player_handlers::{self, HealthState};

/// Create the API router with Swagger UI
///
/// Three route groups with their own state: unauthenticated health
/// endpoints, player lookups behind the API key middleware, and the admin
/// group behind the session middleware (login excepted).
pub fn create_router(
    stats_service: Arc<StatsService>,
    pool: DatabasePool,
    api_key_state: ApiKeyState,
    admin_state: AdminState,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(player_handlers::health_check))
        .route("/api/v1/health", get(player_handlers::api_health))
        .with_state(HealthState { pool });

    let player_routes = Router::new()
        .route("/api/v1/players/:steam_id", get(player_handlers::get_player_summary))
        .route(
            "/api/v1/players/:steam_id/profile",
            get(player_handlers::get_player_profile),
        )
        .route(
            "/api/v1/players/:steam_id/stats",
            get(player_handlers::get_player_stats),
        )
        .route(
            "/api/v1/players/:steam_id/elo",
            get(player_handlers::get_player_elo),
        )
        .route(
            "/api/v1/players/:steam_id/bans",
            get(player_handlers::get_player_bans),
        )
        .route_layer(middleware::from_fn_with_state(
            api_key_state,
            require_api_key,
        ))
        .with_state(stats_service);

    let admin_protected = Router::new()
        .route("/api/v1/admin/logout", post(admin_handlers::logout))
        .route("/api/v1/admin/session", get(admin_handlers::current_session))
        .route(
            "/api/v1/admin/tokens",
            post(admin_handlers::create_token).get(admin_handlers::list_tokens),
        )
        .route(
            "/api/v1/admin/tokens/:token_id",
            delete(admin_handlers::delete_token),
        )
        .route("/api/v1/admin/logs", get(admin_handlers::list_logs))
        .route_layer(middleware::from_fn_with_state(
            admin_state.session.clone(),
            require_admin_session,
        ))
        .with_state(admin_state.clone());

    let admin_routes = Router::new()
        .route("/api/v1/admin/login", post(admin_handlers::login))
        .with_state(admin_state)
        .merge(admin_protected);

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(health_routes)
        .merge(player_routes)
        .merge(admin_routes)
}
