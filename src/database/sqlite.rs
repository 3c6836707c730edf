use crate::database::{RepoError, RepoResult, UserRepository};
use crate::domain::{NewUser, User};
use crate::features::users::model::DbUser;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

// AUTOINCREMENT keeps sqlite from handing out the id of a deleted row again
const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (name <> ''),
        email TEXT NOT NULL UNIQUE,
        age INTEGER,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

pub struct SqliteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn ensure_schema(&self) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *conn).await?;
        Ok(())
    }

    async fn create_user(&self, user: &NewUser) -> RepoResult<i64> {
        let now = Utc::now();
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, age, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!("Inserted {} as user {}", user, id);
        Ok(id)
    }

    async fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, DbUser>(
            "SELECT id, name, email, age, created_at, updated_at FROM users",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: i64) -> RepoResult<User> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, DbUser>(
            "SELECT id, name, email, age, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(User::from).ok_or(RepoError::NotFound(id))
    }

    async fn update_user(&self, id: i64, user: &NewUser) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result =
            sqlx::query("UPDATE users SET name = ?, email = ?, age = ?, updated_at = ? WHERE id = ?")
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.age)
                .bind(Utc::now())
                .bind(id)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(id));
        }

        tracing::debug!("Updated user {} to {}", id, user);
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(id));
        }

        tracing::debug!("Deleted user {}", id);
        Ok(())
    }
}
