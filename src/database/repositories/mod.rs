/// Repository pattern implementations
///
/// Each repository owns one entity type and exposes a focused trait so
/// handlers and jobs depend on contracts, not concrete Diesel types.
pub mod admin_repository;
pub mod log_repository;
pub mod player_cache_repository;
pub mod session_repository;
pub mod token_repository;

pub use admin_repository::{AdminRepository, AdminRepositoryImpl};
pub use log_repository::{LogRepository, LogRepositoryImpl};
pub use player_cache_repository::{
    PlayerCacheRepository, PlayerCacheRepositoryImpl, StaleCutoffs,
};
pub use session_repository::{SessionRepository, SessionRepositoryImpl};
pub use token_repository::{TokenRepository, TokenRepositoryImpl};
