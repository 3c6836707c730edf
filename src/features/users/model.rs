use crate::domain::{NewUser, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for JsonUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of `POST /users` and `PUT /users/{id}`.
#[derive(Deserialize, Debug, Clone)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<i32>,
}

impl From<UserPayload> for NewUser {
    fn from(payload: UserPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            age: payload.age,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UsersResponse {
    pub users: Vec<JsonUser>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub user: JsonUser,
}
