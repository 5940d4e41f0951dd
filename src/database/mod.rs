/// Database module for the PostgreSQL admin store and player caches
///
/// This module provides:
/// - Connection pooling via r2d2
/// - Embedded Diesel migrations, applied on startup
/// - Repository pattern implementations for every entity
/// - Database models and schema
pub mod connection;
pub mod models;
pub mod repositories;
pub mod schema;

pub use connection::{establish_connection_pool, DatabaseError, DatabasePool};
