use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use super::error::ApiError;
use super::responses::*;
use crate::auth::secrets::{generate_api_token, generate_session_token, verify_password};
use crate::auth::session::{
    build_session_cookie, clear_session_cookie, extract_session_token, AdminContext, SessionState,
};
use crate::database::models::{ApiToken, NewApiToken, NewRequestLog, NewSession};
use crate::database::repositories::{LogRepository, TokenRepository};
use crate::utils::pagination;

const MAX_LABEL_LEN: usize = 64;

/// Shared state for the admin endpoints
#[derive(Clone)]
pub struct AdminState {
    pub session: SessionState,
    pub token_repository: Arc<dyn TokenRepository>,
    pub log_repository: Arc<dyn LogRepository>,
}

impl AdminState {
    /// Write an admin-action audit row; failures are logged, not fatal
    fn audit(&self, actor: &str, method: &str, path: &str, status: StatusCode) {
        let entry = NewRequestLog::new(
            actor.to_string(),
            method.to_string(),
            path.to_string(),
            status.as_u16() as i32,
        );
        if let Err(e) = self.log_repository.insert(entry) {
            tracing::warn!("Failed to write audit log row: {}", e);
        }
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "Admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created, cookie set", body = AdminSessionResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AdminState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const PATH: &str = "/api/v1/admin/login";

    let admin = state
        .session
        .admin_repository
        .find_by_username(&request.username)?;

    let admin = match admin {
        Some(admin) => admin,
        None => {
            state.audit("-", "POST", PATH, StatusCode::UNAUTHORIZED);
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let verified = verify_password(&request.password, &admin.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !verified {
        state.audit("-", "POST", PATH, StatusCode::UNAUTHORIZED);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_session_token();
    let lifetime = chrono::Duration::hours(state.session.session_ttl_hours);
    state
        .session
        .session_repository
        .insert(NewSession::new(token.clone(), admin.id, lifetime))?;

    state.audit(&admin.username, "POST", PATH, StatusCode::OK);
    tracing::info!("Admin '{}' logged in", admin.username);

    let cookie = build_session_cookie(&token, state.session.session_ttl_hours);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AdminSessionResponse {
            admin_id: admin.id,
            username: admin.username,
        }),
    ))
}

/// Log out and clear the session cookie
#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    tag = "Admin",
    responses(
        (status = 200, description = "Session removed, cookie cleared", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AdminState>,
    Extension(admin): Extension<AdminContext>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = extract_session_token(&headers) {
        state.session.session_repository.delete(&token)?;
    }

    state.audit(&admin.username, "POST", "/api/v1/admin/logout", StatusCode::OK);

    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Identify the current session
#[utoipa::path(
    get,
    path = "/api/v1/admin/session",
    tag = "Admin",
    responses(
        (status = 200, description = "Current admin identity", body = AdminSessionResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn current_session(
    Extension(admin): Extension<AdminContext>,
) -> Json<AdminSessionResponse> {
    Json(AdminSessionResponse {
        admin_id: admin.admin_id,
        username: admin.username,
    })
}

// ============================================================================
// API tokens
// ============================================================================

/// Issue a new API token
#[utoipa::path(
    post,
    path = "/api/v1/admin/tokens",
    tag = "Admin",
    request_body = CreateTokenRequest,
    responses(
        (status = 201, description = "Token created", body = ApiToken),
        (status = 400, description = "Invalid label", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn create_token(
    State(state): State<AdminState>,
    Extension(admin): Extension<AdminContext>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<(StatusCode, Json<ApiToken>), ApiError> {
    let label = request.label.trim();
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(ApiError::BadRequest(format!(
            "Label must be 1-{} characters",
            MAX_LABEL_LEN
        )));
    }

    let token = state
        .token_repository
        .insert(NewApiToken::new(generate_api_token(), label.to_string()))?;

    state.audit(
        &admin.username,
        "POST",
        "/api/v1/admin/tokens",
        StatusCode::CREATED,
    );
    tracing::info!("API token '{}' created by '{}'", token.label, admin.username);

    Ok((StatusCode::CREATED, Json(token)))
}

/// List all API tokens
#[utoipa::path(
    get,
    path = "/api/v1/admin/tokens",
    tag = "Admin",
    responses(
        (status = 200, description = "All tokens, newest first", body = Vec<ApiToken>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_tokens(
    State(state): State<AdminState>,
) -> Result<Json<Vec<ApiToken>>, ApiError> {
    let tokens = state.token_repository.get_all()?;
    Ok(Json(tokens))
}

/// Delete an API token
#[utoipa::path(
    delete,
    path = "/api/v1/admin/tokens/{token_id}",
    tag = "Admin",
    params(
        ("token_id" = i64, Path, description = "Token ID")
    ),
    responses(
        (status = 200, description = "Token deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Token not found", body = ErrorResponse)
    )
)]
pub async fn delete_token(
    State(state): State<AdminState>,
    Extension(admin): Extension<AdminContext>,
    Path(token_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state.token_repository.delete(token_id)?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Token {} not found", token_id)));
    }

    state.audit(
        &admin.username,
        "DELETE",
        &format!("/api/v1/admin/tokens/{}", token_id),
        StatusCode::OK,
    );
    tracing::info!("API token {} deleted by '{}'", token_id, admin.username);

    Ok(Json(MessageResponse {
        message: format!("Token {} deleted", token_id),
    }))
}

// ============================================================================
// Audit logs
// ============================================================================

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogPageParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: i64,
    /// Rows per page, clamped to [1, 200]
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

/// List audit log rows, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/logs",
    tag = "Admin",
    params(LogPageParams),
    responses(
        (status = 200, description = "One page of audit rows", body = LogPageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_logs(
    State(state): State<AdminState>,
    Query(params): Query<LogPageParams>,
) -> Result<Json<LogPageResponse>, ApiError> {
    let page = pagination::normalize_page(params.page);
    let per_page = pagination::clamp_per_page(params.per_page);

    let total = state.log_repository.count()?;
    let entries = state.log_repository.page(page, per_page)?;

    Ok(Json(LogPageResponse {
        entries,
        total,
        page,
        per_page,
        total_pages: pagination::total_pages(total, per_page),
    }))
}
