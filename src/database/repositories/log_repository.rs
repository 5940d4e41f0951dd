use crate::database::connection::{DatabaseError, PgPooledConnection};
use crate::database::models::{NewRequestLog, RequestLog};
use crate::database::schema::request_logs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;

/// Audit log repository trait
pub trait LogRepository: Send + Sync {
    /// Insert an audit row
    fn insert(&self, entry: NewRequestLog) -> Result<RequestLog, DatabaseError>;

    /// Fetch one page of audit rows, newest first
    ///
    /// `page` is 1-based; callers are expected to clamp `per_page` before
    /// calling. A page past the end yields an empty vec.
    fn page(&self, page: i64, per_page: i64) -> Result<Vec<RequestLog>, DatabaseError>;

    /// Total number of audit rows
    fn count(&self) -> Result<i64, DatabaseError>;

    /// Delete rows created before `cutoff`, returning the count
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DatabaseError>;
}

/// Concrete implementation of LogRepository
pub struct LogRepositoryImpl {
    get_conn: Arc<dyn Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync>,
}

impl LogRepositoryImpl {
    pub fn new<F>(get_conn: F) -> Self
    where
        F: Fn() -> Result<PgPooledConnection, DatabaseError> + Send + Sync + 'static,
    {
        Self {
            get_conn: Arc::new(get_conn),
        }
    }
}

impl LogRepository for LogRepositoryImpl {
    fn insert(&self, entry: NewRequestLog) -> Result<RequestLog, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::insert_into(request_logs::table)
            .values(&entry)
            .get_result::<RequestLog>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn page(&self, page: i64, per_page: i64) -> Result<Vec<RequestLog>, DatabaseError> {
        let mut conn = (self.get_conn)()?;
        let offset = (page - 1) * per_page;

        request_logs::table
            .order(request_logs::created_at.desc())
            .limit(per_page)
            .offset(offset)
            .load::<RequestLog>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn count(&self) -> Result<i64, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        request_logs::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(DatabaseError::from)
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DatabaseError> {
        let mut conn = (self.get_conn)()?;

        diesel::delete(request_logs::table)
            .filter(request_logs::created_at.lt(cutoff))
            .execute(&mut conn)
            .map_err(DatabaseError::from)
    }
}

#[cfg(test)]
mod tests {
    // Repository tests require an actual database connection - skip in CI
    #[test]
    #[ignore]
    fn test_log_repository() {
        // Exercised against a local database with DATABASE_URL set
    }
}
