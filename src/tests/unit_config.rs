use crate::config::{DatabaseTarget, ServiceConfig};
use std::collections::HashMap;
use std::time::Duration;

// build a config from a fixed set of variables instead of the real process environment
fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<ServiceConfig> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServiceConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_mysql_config_with_defaults() {
    let config = config_from(&[
        ("MYSQL_USER", "app"),
        ("MYSQL_PASSWORD", "hunter2"),
        ("MYSQL_DATABASE", "appdb"),
    ])
    .unwrap();

    assert_eq!(
        config.database,
        DatabaseTarget::MySql {
            host: "localhost".into(),
            port: 3306,
            user: "app".into(),
            password: "hunter2".into(),
            database: "appdb".into(),
        }
    );
    assert_eq!(config.max_connections, 15);
    assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
}

#[test]
fn test_mysql_config_overrides() {
    let config = config_from(&[
        ("DB_HOST", "db.internal"),
        ("DB_PORT", "3307"),
        ("MYSQL_USER", "app"),
        ("MYSQL_DATABASE", "appdb"),
        ("MAX_CONNECTIONS", "4"),
        ("DB_ACQUIRE_TIMEOUT_SECS", "1"),
        ("BIND_ADDR", "127.0.0.1:8080"),
    ])
    .unwrap();

    match &config.database {
        DatabaseTarget::MySql {
            host,
            port,
            password,
            ..
        } => {
            assert_eq!(host, "db.internal");
            assert_eq!(*port, 3307);
            assert_eq!(password, "");
        }
        other => panic!("expected mysql target, got {:?}", other),
    }
    assert_eq!(config.max_connections, 4);
    assert_eq!(config.acquire_timeout, Duration::from_secs(1));
    assert_eq!(config.bind_addr.port(), 8080);
}

#[test]
fn test_sqlite_url_replaces_mysql() {
    let config = config_from(&[("DATABASE_URL", "sqlite://users.db")]).unwrap();

    assert_eq!(
        config.database,
        DatabaseTarget::Sqlite {
            url: "sqlite://users.db".into()
        }
    );
}

#[test]
fn test_non_sqlite_database_url_is_rejected() {
    let result = config_from(&[("DATABASE_URL", "postgres://localhost/app")]);
    assert!(result.is_err());
}

#[test]
fn test_missing_required_variables() {
    let err = config_from(&[("MYSQL_DATABASE", "appdb")]).unwrap_err();
    assert!(err.to_string().contains("MYSQL_USER"));

    let err = config_from(&[("MYSQL_USER", "app")]).unwrap_err();
    assert!(err.to_string().contains("MYSQL_DATABASE"));
}

#[test]
fn test_invalid_numbers_are_rejected() {
    let base = [("MYSQL_USER", "app"), ("MYSQL_DATABASE", "appdb")];

    let mut vars = base.to_vec();
    vars.push(("DB_PORT", "not-a-port"));
    assert!(config_from(&vars).is_err());

    let mut vars = base.to_vec();
    vars.push(("MAX_CONNECTIONS", "0"));
    assert!(config_from(&vars).is_err());

    let mut vars = base.to_vec();
    vars.push(("BIND_ADDR", "nowhere"));
    assert!(config_from(&vars).is_err());
}

// the password must never show up when the target is logged
#[test]
fn test_password_is_not_printed() {
    let config = config_from(&[
        ("MYSQL_USER", "app"),
        ("MYSQL_PASSWORD", "hunter2"),
        ("MYSQL_DATABASE", "appdb"),
    ])
    .unwrap();

    assert_eq!(
        config.database.to_string(),
        "mysql://app@localhost:3306/appdb"
    );
    assert!(!format!("{:?}", config).contains("hunter2"));
}
