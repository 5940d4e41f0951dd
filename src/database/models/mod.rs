pub mod admin;
pub mod api_token;
pub mod player;
pub mod request_log;

pub use admin::{Admin, NewAdmin, NewSession, Session};
pub use api_token::{ApiToken, NewApiToken};
pub use player::{
    NewPlayerBans, NewPlayerElo, NewPlayerProfile, NewPlayerStats, PlayerBans, PlayerElo,
    PlayerProfile, PlayerStats,
};
pub use request_log::{NewRequestLog, RequestLog};
