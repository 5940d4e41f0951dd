use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API token entity - grants access to the public player endpoints
///
/// Tokens are opaque strings checked by SQL equality against the
/// `X-API-Key` header. Deleting the row is the only revocation.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::api_tokens)]
pub struct ApiToken {
    pub id: i64,

    /// Token value (`csg_` + 64 hex chars), presented in `X-API-Key`
    pub token: String,

    /// Human-readable label identifying the consumer
    pub label: String,

    pub created_at: DateTime<Utc>,

    /// Last time the token authenticated a request
    pub last_used_at: Option<DateTime<Utc>>,
}

/// New API token for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::database::schema::api_tokens)]
pub struct NewApiToken {
    pub token: String,
    pub label: String,
}

impl NewApiToken {
    pub fn new(token: String, label: String) -> Self {
        Self { token, label }
    }
}
