use crate::domain::{NewUser, User};
use async_trait::async_trait;

pub mod mysql;
pub mod sqlite;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("user {0} not found")]
    NotFound(i64),

    #[error("unique constraint violated: {0}")]
    Conflict(#[source] sqlx::Error),

    #[error("check constraint violated: {0}")]
    Invalid(#[source] sqlx::Error),

    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        let unique_violation = matches!(
            &err,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation()
        );
        if unique_violation {
            return Self::Conflict(err);
        }

        // the only check constraint is the non-empty name
        let check_violation = matches!(
            &err,
            sqlx::Error::Database(db_err) if db_err.is_check_violation()
        );
        if check_violation {
            return Self::Invalid(err);
        }

        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err),
            _ => Self::Storage(err),
        }
    }
}

// a repository is shared between request tasks behind an Arc; sqlx::Pool is thread safe.
// every method acquires its own pooled connection and gives it back before returning.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates the users table if it does not exist yet.
    async fn ensure_schema(&self) -> RepoResult<()>;

    /// Inserts a user and returns the id assigned by the database.
    async fn create_user(&self, user: &NewUser) -> RepoResult<i64>;
    async fn list_users(&self) -> RepoResult<Vec<User>>;
    async fn get_user(&self, id: i64) -> RepoResult<User>;

    // write operations report NotFound when no row was affected
    async fn update_user(&self, id: i64, user: &NewUser) -> RepoResult<()>;
    async fn delete_user(&self, id: i64) -> RepoResult<()>;
}
