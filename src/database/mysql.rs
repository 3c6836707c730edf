use crate::database::{RepoError, RepoResult, UserRepository};
use crate::domain::{NewUser, User};
use crate::features::users::model::DbUser;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL CHECK (name <> ''),
        email VARCHAR(255) NOT NULL UNIQUE,
        age INT,
        created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
        updated_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6) ON UPDATE CURRENT_TIMESTAMP(6)
    )
"#;

pub struct MySqlRepository {
    pool: Pool<MySql>,
}

impl MySqlRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlRepository {
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

        let id = i64::try_from(result.last_insert_id()).map_err(|e| {
            RepoError::Storage(sqlx::Error::Decode(Box::new(e)))
        })?;
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

        // updated_at is bound here rather than left to ON UPDATE, which only fires
        // when some other column actually changes
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
