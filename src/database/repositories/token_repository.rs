use crate::database::connection::{DatabaseError, PgPooledConnection};
use crate::database::models::{ApiToken, NewApiToken};
use crate::database::schema::api_tokens;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

/// API token repository trait
///
/// Tokens are matched by plain SQL equality against the header value;
/// there is no hashing or rotation in this model.
pub trait TokenRepository: Send + Sync {
    /// Find a token row by its value
    fn find_by_token(&self, token: &str) -> Result<Option<ApiToken>, DatabaseError>;

    /// Get all tokens, newest first
    fn get_all(&self) -> Result<Vec<ApiToken>, DatabaseError>;

    /// Insert a new token
    fn insert(&self, new_token: NewApiToken) -> Result<ApiToken, DatabaseError>;

    /// Stamp `last_used_at` after a successful authentication
    fn touch_last_used(&self, token_id: i64) -> Result<(), DatabaseError>;

    /// Delete a token by ID. Returns true if a row was removed
    fn delete(&self, token_id: i64) -> Result<bool, DatabaseError>;
}

/// Concrete implementation of TokenRepository
pub struct TokenRepositoryImpl {
    get_conn: Arc<dyn Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync>,
}

impl TokenRepositoryImpl {
    pub fn new<F>(get_conn: F) -> Self
    where
        F: Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            get_conn: Arc::new(get_conn),
        }
    }
}

impl TokenRepository for TokenRepositoryImpl {
    fn find_by_token(&self, token: &str) -> Result<Option<ApiToken>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        api_tokens::table
            .filter(api_tokens::token.eq(token))
            .first::<ApiToken>(&mut conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn get_all(&self) -> Result<Vec<ApiToken>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        api_tokens::table
            .order(api_tokens::created_at.desc())
            .load::<ApiToken>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn insert(&self, new_token: NewApiToken) -> Result<ApiToken, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::insert_into(api_tokens::table)
            .values(&new_token)
            .get_result::<ApiToken>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn touch_last_used(&self, token_id: i64) -> Result<(), DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::update(api_tokens::table)
            .filter(api_tokens::id.eq(token_id))
            .set(api_tokens::last_used_at.eq(Some(Utc::now())))
            .execute(&mut conn)?;

        Ok(())
    }

    fn delete(&self, token_id: i64) -> Result<bool, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        let deleted = diesel::delete(api_tokens::table)
            .filter(api_tokens::id.eq(token_id))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require an actual database connection - skip in CI
    #[test]
    #[ignore]
    fn test_token_repository() {
        // Exercised against a local database with DATABASE_URL set
    }
}
