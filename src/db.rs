use crate::config::{DatabaseTarget, ServiceConfig};
use crate::database::UserRepository;
use crate::database::mysql::MySqlRepository;
use crate::database::sqlite::SqliteRepository;
use anyhow::{Context, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;

/// Opens the pool for the configured backend and wraps it in a repository.
pub async fn connect(config: &ServiceConfig) -> Result<Arc<dyn UserRepository>> {
    match &config.database {
        DatabaseTarget::MySql {
            host,
            port,
            user,
            password,
            database,
        } => {
            let options = MySqlConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(database);

            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout)
                .connect_with(options)
                .await
                .with_context(|| format!("Failed to create pool on {}", config.database))?;

            Ok(Arc::new(MySqlRepository::new(pool)))
        }
        DatabaseTarget::Sqlite { url } => {
            let options = SqliteConnectOptions::from_str(url)
                .with_context(|| format!("Invalid sqlite url {}", url))?
                .create_if_missing(true);

            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout)
                .connect_with(options)
                .await
                .with_context(|| format!("Failed to create pool on {}", url))?;

            Ok(Arc::new(SqliteRepository::new(pool)))
        }
    }
}
