//! `X-API-Key` authentication for the public player endpoints.
//!
//! A request passes when the header value matches an `api_tokens` row by
//! SQL equality. Every attempt is written to the audit log: accepted
//! requests with the token's label and the real response status, rejected
//! ones with actor "-" and 401.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::responses::ErrorResponse;
use crate::database::models::NewRequestLog;
use crate::database::repositories::{LogRepository, TokenRepository};

/// Header carrying the API token
pub const API_KEY_HEADER: &str = "x-api-key";

/// Actor recorded for unauthenticated attempts
const ANONYMOUS_ACTOR: &str = "-";

/// State for the API key middleware
#[derive(Clone)]
pub struct ApiKeyState {
    pub token_repository: Arc<dyn TokenRepository>,
    pub log_repository: Arc<dyn LogRepository>,
}

/// Middleware guarding the public player endpoints
pub async fn require_api_key(
    State(state): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let key = match presented {
        Some(key) => key,
        None => {
            return reject(&state, &method, &path, "Missing X-API-Key header");
        }
    };

    let token = match state.token_repository.find_by_token(key) {
        Ok(Some(token)) => token,
        Ok(None) => {
            return reject(&state, &method, &path, "Unknown API key");
        }
        Err(e) => {
            tracing::error!("API key lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: StatusCode::INTERNAL_SERVER_ERROR.to_string(),
                    message: "API key lookup failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Non-fatal: the request proceeds even if the stamp fails
    if let Err(e) = state.token_repository.touch_last_used(token.id) {
        tracing::warn!("Failed to stamp last_used_at for token {}: {}", token.id, e);
    }

    let response = next.run(request).await;

    let entry = NewRequestLog::new(
        token.label.clone(),
        method,
        path,
        response.status().as_u16() as i32,
    );
    if let Err(e) = state.log_repository.insert(entry) {
        tracing::warn!("Failed to write audit log row: {}", e);
    }

    response
}

fn reject(state: &ApiKeyState, method: &str, path: &str, message: &str) -> Response {
    tracing::debug!("Rejected {} {}: {}", method, path, message);

    let entry = NewRequestLog::new(
        ANONYMOUS_ACTOR.to_string(),
        method.to_string(),
        path.to_string(),
        StatusCode::UNAUTHORIZED.as_u16() as i32,
    );
    if let Err(e) = state.log_repository.insert(entry) {
        tracing::warn!("Failed to write audit log row: {}", e);
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: StatusCode::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use chrono::Utc;
    use std::sync::Mutex;
    use tower::ServiceExt;

    use crate::database::models::{ApiToken, RequestLog};
    use crate::database::repositories::{LogRepository, TokenRepository};
    use crate::database::DatabaseError;

    const KNOWN_KEY: &str = "csg_0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    /// In-memory token table holding exactly one known token
    struct MemoryTokens {
        touched: Mutex<Vec<i64>>,
    }

    impl MemoryTokens {
        fn new() -> Self {
            Self {
                touched: Mutex::new(Vec::new()),
            }
        }

        fn known_token() -> ApiToken {
            ApiToken {
                id: 7,
                token: KNOWN_KEY.to_string(),
                label: "load-tester".to_string(),
                created_at: Utc::now(),
                last_used_at: None,
            }
        }
    }

    impl TokenRepository for MemoryTokens {
        fn find_by_token(&self, token: &str) -> Result<Option<ApiToken>, DatabaseError> {
            if token == KNOWN_KEY {
                Ok(Some(Self::known_token()))
            } else {
                Ok(None)
            }
        }

        fn get_all(&self) -> Result<Vec<ApiToken>, DatabaseError> {
            Ok(vec![Self::known_token()])
        }

        fn insert(&self, _: crate::database::models::NewApiToken) -> Result<ApiToken, DatabaseError> {
            unimplemented!("not exercised")
        }

        fn touch_last_used(&self, token_id: i64) -> Result<(), DatabaseError> {
            self.touched.lock().unwrap().push(token_id);
            Ok(())
        }

        fn delete(&self, _: i64) -> Result<bool, DatabaseError> {
            unimplemented!("not exercised")
        }
    }

    /// In-memory audit log capturing inserted rows
    #[derive(Default)]
    struct MemoryLogs {
        entries: Mutex<Vec<NewRequestLog>>,
    }

    impl LogRepository for MemoryLogs {
        fn insert(&self, entry: NewRequestLog) -> Result<RequestLog, DatabaseError> {
            let stored = RequestLog {
                id: 1,
                actor: entry.actor.clone(),
                method: entry.method.clone(),
                path: entry.path.clone(),
                status: entry.status,
                created_at: Utc::now(),
            };
            self.entries.lock().unwrap().push(entry);
            Ok(stored)
        }

        fn page(&self, _: i64, _: i64) -> Result<Vec<RequestLog>, DatabaseError> {
            Ok(Vec::new())
        }

        fn count(&self) -> Result<i64, DatabaseError> {
            Ok(self.entries.lock().unwrap().len() as i64)
        }

        fn delete_older_than(
            &self,
            _: chrono::DateTime<Utc>,
        ) -> Result<usize, DatabaseError> {
            Ok(0)
        }
    }

    fn guarded_app(tokens: Arc<MemoryTokens>, logs: Arc<MemoryLogs>) -> Router {
        let state = ApiKeyState {
            token_repository: tokens,
            log_repository: logs,
        };

        Router::new()
            .route("/api/v1/players/:steam_id", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(state, require_api_key))
    }

    fn player_request(key: Option<&str>) -> axum::http::Request<Body> {
        let builder = axum::http::Request::builder()
            .method("GET")
            .uri("/api/v1/players/76561198000000001");
        let builder = match key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected_and_logged_as_anonymous() {
        let tokens = Arc::new(MemoryTokens::new());
        let logs = Arc::new(MemoryLogs::default());

        let response = guarded_app(tokens.clone(), logs.clone())
            .oneshot(player_request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(tokens.touched.lock().unwrap().is_empty());

        let entries = logs.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, "-");
        assert_eq!(entries[0].status, 401);
        assert_eq!(entries[0].path, "/api/v1/players/76561198000000001");
    }

    #[tokio::test]
    async fn test_unknown_key_is_rejected_and_logged_as_anonymous() {
        let tokens = Arc::new(MemoryTokens::new());
        let logs = Arc::new(MemoryLogs::default());

        let response = guarded_app(tokens.clone(), logs.clone())
            .oneshot(player_request(Some("csg_not_in_the_table")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(tokens.touched.lock().unwrap().is_empty());

        let entries = logs.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, "-");
        assert_eq!(entries[0].status, 401);
    }

    #[tokio::test]
    async fn test_valid_key_passes_stamps_and_logs_real_status() {
        let tokens = Arc::new(MemoryTokens::new());
        let logs = Arc::new(MemoryLogs::default());

        let response = guarded_app(tokens.clone(), logs.clone())
            .oneshot(player_request(Some(KNOWN_KEY)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*tokens.touched.lock().unwrap(), vec![7]);

        let entries = logs.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, "load-tester");
        assert_eq!(entries[0].method, "GET");
        assert_eq!(entries[0].status, 200);
    }
}
