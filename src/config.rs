use anyhow::{Context, Result, anyhow};
use derive_more::derive::Display;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 3306;
const DEFAULT_MAX_CONNECTIONS: u32 = 15;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Where the users table lives.
#[derive(Clone, PartialEq, Eq, Display)]
pub enum DatabaseTarget {
    // never print the password
    #[display("mysql://{user}@{host}:{port}/{database}")]
    MySql {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
    #[display("{url}")]
    Sqlite { url: String },
}

impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatabaseTarget({})", self)
    }
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database: DatabaseTarget,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // split out from `from_env` so tests can feed variables without touching the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL") {
            Some(url) if url.starts_with("sqlite:") => DatabaseTarget::Sqlite { url },
            Some(_) => {
                return Err(anyhow!(
                    "DATABASE_URL only accepts sqlite: urls; configure MySQL with DB_HOST, DB_PORT, MYSQL_USER, MYSQL_PASSWORD and MYSQL_DATABASE"
                ));
            }
            None => DatabaseTarget::MySql {
                host: lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
                port: parse_or(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
                user: lookup("MYSQL_USER")
                    .context("Failed to determine MYSQL_USER from environment variables")?,
                password: lookup("MYSQL_PASSWORD").unwrap_or_default(),
                database: lookup("MYSQL_DATABASE")
                    .context("Failed to determine MYSQL_DATABASE from environment variables")?,
            },
        };

        let max_connections = parse_or(&lookup, "MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(anyhow!("MAX_CONNECTIONS must be at least 1"));
        }

        let acquire_timeout = Duration::from_secs(parse_or(
            &lookup,
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?);

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("Failed to parse BIND_ADDR as a socket address")?;

        Ok(Self {
            database,
            max_connections,
            acquire_timeout,
            bind_addr,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {} value '{}'", key, raw)),
        None => Ok(default),
    }
}
