use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Admin entity - a dashboard operator account
///
/// The password hash is an Argon2id PHC string and is never serialized.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::database::schema::admins)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New admin for insertion (bootstrap or provisioning)
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::database::schema::admins)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
}

/// Session entity - one row per live admin session cookie
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::database::schema::sessions)]
#[diesel(primary_key(token))]
pub struct Session {
    /// Opaque random token carried in the session cookie
    pub token: String,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// New session for insertion
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::database::schema::sessions)]
pub struct NewSession {
    pub token: String,
    pub admin_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl NewSession {
    pub fn new(token: String, admin_id: i64, lifetime: chrono::Duration) -> Self {
        Self {
            token,
            admin_id,
            expires_at: Utc::now() + lifetime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expiry_in_future() {
        let session = NewSession::new("abc".to_string(), 1, chrono::Duration::hours(24));
        assert_eq!(session.admin_id, 1);
        assert!(session.expires_at > Utc::now());
    }
}
