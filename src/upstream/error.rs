use thiserror::Error;

/// Errors from the third-party esports APIs
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider has no record for this player (or the record is hidden)
    #[error("player not found upstream")]
    NotFound,

    /// Connection / timeout / TLS level failure
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with an unexpected HTTP status
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Provider answered 200 but the body did not have the expected shape
    #[error("unexpected upstream payload: {0}")]
    Payload(String),
}
