// Library Crate Root
// lib.rs

pub mod api;
pub mod auth;
pub mod database;
pub mod jobs;
pub mod stats;
pub mod upstream;
pub mod utils;

// Re-export at crate root
pub use api::{create_router, AdminState};
pub use database::{establish_connection_pool, DatabasePool};
pub use stats::{CacheTtls, StatsService};
pub use upstream::{FaceitClient, SteamClient, UpstreamClients};
