use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Audit log entity - one row per authenticated API request or admin action
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::database::schema::request_logs)]
pub struct RequestLog {
    pub id: i64,

    /// API token label, admin username, or "-" for rejected requests
    pub actor: String,

    pub method: String,
    pub path: String,

    /// HTTP status code of the response
    pub status: i32,

    pub created_at: DateTime<Utc>,
}

/// New audit log row for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::database::schema::request_logs)]
pub struct NewRequestLog {
    pub actor: String,
    pub method: String,
    pub path: String,
    pub status: i32,
}

impl NewRequestLog {
    pub fn new(actor: String, method: String, path: String, status: i32) -> Self {
        Self {
            actor,
            method,
            path,
            status,
        }
    }
}
