pub mod admin_handlers;
pub mod error;
pub mod openapi;
pub mod player_handlers;
pub mod responses;
pub mod routes;

pub use admin_handlers::AdminState;
pub use error::ApiError;
pub use player_handlers::{HealthState, PlayerState};
pub use routes::create_router;
