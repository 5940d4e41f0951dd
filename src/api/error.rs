use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::responses::ErrorResponse;
use crate::database::DatabaseError;
use crate::stats::StatsError;

/// API-level error, mapped onto an HTTP status and JSON body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// An upstream provider failed and no cached row could cover for it
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl From<StatsError> for ApiError {
    fn from(e: StatsError) -> Self {
        match e {
            StatsError::InvalidSteamId(id) => {
                ApiError::BadRequest(format!("Invalid SteamID64: {}", id))
            }
            StatsError::PlayerNotFound => ApiError::NotFound("Player not found".to_string()),
            StatsError::Database(e) => ApiError::Internal(e.to_string()),
            StatsError::Upstream(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Convert ApiError to an HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_mapping() {
        let e = ApiError::from(StatsError::InvalidSteamId("abc".to_string()));
        assert!(matches!(e, ApiError::BadRequest(_)));

        let e = ApiError::from(StatsError::PlayerNotFound);
        assert!(matches!(e, ApiError::NotFound(_)));

        let e = ApiError::from(StatsError::Upstream(
            crate::upstream::UpstreamError::Status(503),
        ));
        assert!(matches!(e, ApiError::BadGateway(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NotFound("Player not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::BadGateway("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
