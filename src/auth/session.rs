//! Session-cookie authentication for the admin endpoints.
//!
//! Login stores a random token in the `sessions` table and hands it to the
//! browser in an HTTP-only cookie. The middleware parses the Cookie header
//! itself (simple `name=value; name=value` format), looks the token up and
//! rejects expired or unknown sessions.

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::responses::ErrorResponse;
use crate::database::repositories::{AdminRepository, SessionRepository};

/// Name of the admin session cookie
pub const SESSION_COOKIE: &str = "csgo_admin_session";

/// State for the session middleware and the login/logout handlers
#[derive(Clone)]
pub struct SessionState {
    pub admin_repository: Arc<dyn AdminRepository>,
    pub session_repository: Arc<dyn SessionRepository>,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
}

/// Identity of the authenticated admin, injected as a request extension
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: i64,
    pub username: String,
}

/// Extract the session token from the Cookie header, if present
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name.trim() == SESSION_COOKIE {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

/// Build the Set-Cookie value for a fresh session
pub fn build_session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl_hours * 3600
    )
}

/// Build the Set-Cookie value that clears the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0", SESSION_COOKIE)
}

/// Middleware guarding the admin endpoints (everything except login)
pub async fn require_admin_session(
    State(state): State<SessionState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_session_token(request.headers()) {
        Some(token) => token,
        None => return unauthorized("Missing session cookie"),
    };

    let session = match state.session_repository.find_valid(&token, Utc::now()) {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized("Session expired or unknown"),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            return internal_error("Session lookup failed");
        }
    };

    let admin = match state.admin_repository.find_by_id(session.admin_id) {
        Ok(Some(admin)) => admin,
        // Session row outlived its admin (account removed)
        Ok(None) => return unauthorized("Session expired or unknown"),
        Err(e) => {
            tracing::error!("Admin lookup failed: {}", e);
            return internal_error("Admin lookup failed");
        }
    };

    request.extensions_mut().insert(AdminContext {
        admin_id: admin.id,
        username: admin.username,
    });

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: StatusCode::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: StatusCode::INTERNAL_SERVER_ERROR.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_session_token() {
        let headers = headers_with_cookie("csgo_admin_session=abc123");
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_among_multiple_cookies() {
        let headers =
            headers_with_cookie("theme=dark; csgo_admin_session=abc123; lang=en");
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_missing_or_empty() {
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(extract_session_token(&headers), None);

        let headers = headers_with_cookie("csgo_admin_session=");
        assert_eq!(extract_session_token(&headers), None);

        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_roundtrip() {
        let cookie = build_session_cookie("abc123", 24);
        assert!(cookie.starts_with("csgo_admin_session=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
