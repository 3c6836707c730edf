use chrono::{DateTime, Utc};
use derive_more::derive::Display;

/// A persisted user row, independent of the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{} <{}> (#{})", name, email, id)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller-controlled fields. Create inserts them, update overwrites all three.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{} <{}>", name, email)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}
