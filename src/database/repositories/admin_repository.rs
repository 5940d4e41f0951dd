use crate::database::connection::{DatabaseError, PgPooledConnection};
use crate::database::models::{Admin, NewAdmin};
use crate::database::schema::admins;
use diesel::prelude::*;
use std::sync::Arc;

/// Admin repository trait - defines the interface for admin account lookups
pub trait AdminRepository: Send + Sync {
    /// Find admin by ID
    fn find_by_id(&self, admin_id: i64) -> Result<Option<Admin>, DatabaseError>;

    /// Find admin by username
    fn find_by_username(&self, username: &str) -> Result<Option<Admin>, DatabaseError>;

    /// Insert a new admin (startup bootstrap)
    fn insert(&self, new_admin: NewAdmin) -> Result<Admin, DatabaseError>;

    /// Number of admin accounts
    fn count(&self) -> Result<i64, DatabaseError>;
}

/// Concrete implementation of AdminRepository backed by the PostgreSQL pool
pub struct AdminRepositoryImpl {
    get_conn: Arc<dyn Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync>,
}

impl AdminRepositoryImpl {
    /// Create a new admin repository with a connection provider
    pub fn new<F>(get_conn: F) -> Self
    where
        F: Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            get_conn: Arc::new(get_conn),
        }
    }
}

impl AdminRepository for AdminRepositoryImpl {
    fn find_by_id(&self, admin_id: i64) -> Result<Option<Admin>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        admins::table
            .filter(admins::id.eq(admin_id))
            .first::<Admin>(&mut conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        admins::table
            .filter(admins::username.eq(username))
            .first::<Admin>(&mut conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    fn insert(&self, new_admin: NewAdmin) -> Result<Admin, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::insert_into(admins::table)
            .values(&new_admin)
            .get_result::<Admin>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn count(&self) -> Result<i64, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        admins::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(DatabaseError::from)
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require an actual database connection - skip in CI
    #[test]
    #[ignore]
    fn test_admin_repository() {
        // Exercised against a local database with DATABASE_URL set
    }
}
