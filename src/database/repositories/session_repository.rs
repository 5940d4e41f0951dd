use crate::database::connection::{DatabaseError, PgPooledConnection};
use crate::database::models::{NewSession, Session};
use crate::database::schema::sessions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;

/// Session repository trait - admin session cookie persistence
pub trait SessionRepository: Send + Sync {
    /// Insert a new session row
    fn insert(&self, new_session: NewSession) -> Result<Session, DatabaseError>;

    /// Find a session by token that has not expired at `now`
    fn find_valid(&self, token: &str, now: DateTime<Utc>)
        -> Result<Option<Session>, DatabaseError>;

    /// Delete a session by token (logout). Returns true if a row was removed
    fn delete(&self, token: &str) -> Result<bool, DatabaseError>;

    /// Delete all sessions expired at `now`, returning the count
    fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DatabaseError>;
}

/// Concrete implementation of SessionRepository
pub struct SessionRepositoryImpl {
    get_conn: Arc<dyn Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync>,
}

impl SessionRepositoryImpl {
    pub fn new<F>(get_conn: F) -> Self
    where
        F: Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            get_conn: Arc::new(get_conn),
        }
    }
}

impl SessionRepository for SessionRepositoryImpl {
    fn insert(&self, new_session: NewSession) -> Result<Session, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::insert_into(sessions::table)
            .values(&new_session)
            .get_result::<Session>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn find_valid(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        sessions::table
            .filter(sessions::token.eq(token))
            .filter(sessions::expires_at.gt(now))
            .first::<Session>(&mut conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn delete(&self, token: &str) -> Result<bool, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        let deleted = diesel::delete(sessions::table)
            .filter(sessions::token.eq(token))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::delete(sessions::table)
            .filter(sessions::expires_at.le(now))
            .execute(&mut conn)
            .map_err(DatabaseError::from)
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require an actual database connection - skip in CI
    #[test]
    #[ignore]
    fn test_session_repository() {
        // Exercised against a local database with DATABASE_URL set
    }
}
