//! HTTP error type for the users routes.
//!
//! Every failure leaves a handler as `{"error": "..."}` with a status that
//! tells the caller which kind of failure happened.

use crate::database::RepoError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or path (400)
    #[error("{0}")]
    BadRequest(String),

    /// No user with the requested id (404)
    #[error("User not found")]
    NotFound,

    /// Email already taken (409)
    #[error("Email already in use")]
    Conflict,

    /// No database connection could be obtained (503)
    #[error("Database unavailable")]
    Unavailable,

    /// Any other persistence failure (500); carries the per-operation message
    #[error("{0}")]
    Storage(&'static str),
}

impl ApiError {
    /// Logs a repository failure and picks the matching response.
    /// `failure` is the generic message shown to the caller on a 500.
    pub fn from_repo(err: RepoError, failure: &'static str) -> Self {
        match err {
            RepoError::NotFound(id) => {
                tracing::debug!("User {} not found", id);
                Self::NotFound
            }
            RepoError::Conflict(e) => {
                tracing::warn!("{}: {}", failure, e);
                Self::Conflict
            }
            RepoError::Invalid(e) => {
                tracing::warn!("{}: {}", failure, e);
                Self::BadRequest("Name must not be empty".to_string())
            }
            RepoError::Unavailable(e) => {
                tracing::error!("{}: database unavailable: {}", failure, e);
                Self::Unavailable
            }
            RepoError::Storage(e) => {
                tracing::error!("{}: {}", failure, e);
                Self::Storage(failure)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
