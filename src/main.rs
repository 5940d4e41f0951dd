use csgo_stats_api::api::AdminState;
use csgo_stats_api::auth::{ApiKeyState, SessionState};
use csgo_stats_api::database::repositories::*;
use csgo_stats_api::{
    create_router, establish_connection_pool, CacheTtls, FaceitClient, SteamClient, StatsService,
    UpstreamClients,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csgo_stats_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to PostgreSQL and apply pending migrations
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("❌ DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let pool_size = std::env::var("DB_POOL_MAX_SIZE")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(20);

    let pool = match establish_connection_pool(&database_url, pool_size) {
        Ok(pool) => {
            tracing::info!("✅ Database connection established");
            pool
        }
        Err(e) => {
            tracing::error!("❌ Failed to establish database connection: {}", e);
            std::process::exit(1);
        }
    };

    // Create repositories
    let pool_clone = pool.clone();
    let admin_repository =
        Arc::new(AdminRepositoryImpl::new(move || pool_clone.get())) as Arc<dyn AdminRepository>;

    let pool_clone = pool.clone();
    let session_repository = Arc::new(SessionRepositoryImpl::new(move || pool_clone.get()))
        as Arc<dyn SessionRepository>;

    let pool_clone = pool.clone();
    let token_repository =
        Arc::new(TokenRepositoryImpl::new(move || pool_clone.get())) as Arc<dyn TokenRepository>;

    let pool_clone = pool.clone();
    let log_repository =
        Arc::new(LogRepositoryImpl::new(move || pool_clone.get())) as Arc<dyn LogRepository>;

    let pool_clone = pool.clone();
    let player_cache_repository = Arc::new(PlayerCacheRepositoryImpl::new(move || {
        pool_clone.get()
    })) as Arc<dyn PlayerCacheRepository>;

    // Seed the first admin account if the table is empty
    bootstrap_admin(&admin_repository);

    // Upstream clients
    let steam_api_key = std::env::var("STEAM_API_KEY").unwrap_or_default();
    if steam_api_key.is_empty() {
        tracing::warn!("⚠️  STEAM_API_KEY is not set; Steam lookups will fail");
    }
    let faceit_api_key = std::env::var("FACEIT_API_KEY").unwrap_or_default();
    if faceit_api_key.is_empty() {
        tracing::warn!("⚠️  FACEIT_API_KEY is not set; FACEIT lookups will fail");
    }

    let mut steam = match SteamClient::new(steam_api_key) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Failed to build Steam client: {}", e);
            std::process::exit(1);
        }
    };
    if let Ok(base) = std::env::var("STEAM_API_BASE") {
        steam = steam.with_base_url(base);
    }

    let mut faceit = match FaceitClient::new(faceit_api_key) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Failed to build FACEIT client: {}", e);
            std::process::exit(1);
        }
    };
    if let Ok(base) = std::env::var("FACEIT_API_BASE") {
        faceit = faceit.with_base_url(base);
    }

    // Cache service
    let ttls = CacheTtls::from_env();
    let stats_service = Arc::new(StatsService::new(
        player_cache_repository.clone(),
        Arc::new(UpstreamClients::new(steam, faceit)),
        ttls,
    ));

    // Auth state
    let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(24);

    let api_key_state = ApiKeyState {
        token_repository: token_repository.clone(),
        log_repository: log_repository.clone(),
    };

    let admin_state = AdminState {
        session: SessionState {
            admin_repository: admin_repository.clone(),
            session_repository: session_repository.clone(),
            session_ttl_hours,
        },
        token_repository,
        log_repository: log_repository.clone(),
    };

    // Initialize cron scheduler for periodic cleanup
    initialize_cron_scheduler(
        session_repository,
        log_repository,
        player_cache_repository,
        ttls,
    )
    .await;

    // Create the router
    let app = create_router(stats_service, pool, api_key_state, admin_state);

    // Define the address
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("🚀 CSGO Stats API server running on http://{}", addr);
    tracing::info!("📊 Health check: http://{}/api/v1/health", addr);
    tracing::info!("📚 Swagger UI: http://{}/swagger-ui", addr);
    tracing::info!("🎯 Player lookups: http://{}/api/v1/players/{{steam_id}}", addr);
    tracing::info!("🔐 Admin login: http://{}/api/v1/admin/login", addr);

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

/// Create the first admin account from ADMIN_USERNAME / ADMIN_PASSWORD
///
/// Only runs when the admins table is empty, so restarting the server
/// never resets an existing password.
fn bootstrap_admin(admin_repository: &Arc<dyn AdminRepository>) {
    use csgo_stats_api::auth::secrets::hash_password;
    use csgo_stats_api::database::models::NewAdmin;

    let count = match admin_repository.count() {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("❌ Failed to count admin accounts: {}", e);
            return;
        }
    };

    if count > 0 {
        return;
    }

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            tracing::warn!(
                "⚠️  No admin accounts exist and ADMIN_PASSWORD is not set; admin API is unusable"
            );
            return;
        }
    };

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("❌ Failed to hash bootstrap admin password: {}", e);
            return;
        }
    };

    match admin_repository.insert(NewAdmin {
        username: username.clone(),
        password_hash,
    }) {
        Ok(_) => tracing::info!("✅ Bootstrap admin account '{}' created", username),
        Err(e) => tracing::error!("❌ Failed to create bootstrap admin account: {}", e),
    }
}

/// Initialize cron scheduler for periodic jobs
async fn initialize_cron_scheduler(
    session_repository: Arc<dyn SessionRepository>,
    log_repository: Arc<dyn LogRepository>,
    player_cache_repository: Arc<dyn PlayerCacheRepository>,
    ttls: CacheTtls,
) {
    use csgo_stats_api::jobs::CleanupJob;
    use tokio_cron_scheduler::JobScheduler;

    tracing::info!("⏰ Initializing cron scheduler...");

    let scheduler = match JobScheduler::new().await {
        Ok(scheduler) => scheduler,
        Err(e) => {
            tracing::error!("❌ Failed to create cron scheduler: {}", e);
            return;
        }
    };

    let log_retention_days = std::env::var("LOG_RETENTION_DAYS")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(90);

    let cleanup_job = CleanupJob::new(
        session_repository,
        log_repository,
        player_cache_repository,
        ttls,
        log_retention_days,
    );

    if let Err(e) = cleanup_job.register(&scheduler).await {
        tracing::error!("❌ Failed to register cleanup job: {}", e);
        return;
    }

    if let Err(e) = scheduler.start().await {
        tracing::error!("❌ Failed to start cron scheduler: {}", e);
        return;
    }

    tracing::info!("✅ Cron scheduler started successfully");
    tracing::info!("   • Cleanup: Hourly (sessions, stale cache rows, old logs)");

    // Keep scheduler alive (it will run in the background)
    std::mem::forget(scheduler);
}
