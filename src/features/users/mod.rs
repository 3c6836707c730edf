pub mod error;
pub mod model;

use crate::AppState;
use crate::domain::NewUser;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::get,
};
use error::ApiError;
use model::{CreatedResponse, JsonUser, SuccessResponse, UserPayload, UserResponse, UsersResponse};

pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
}

// extractor rejections are turned into our own 400 so every error keeps the {"error"} shape
fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::warn!("Rejected user id: {}", rejection.body_text());
            Err(ApiError::BadRequest("Invalid user id".to_string()))
        }
    }
}

fn user_payload(body: Result<Json<UserPayload>, JsonRejection>) -> Result<NewUser, ApiError> {
    match body {
        Ok(Json(payload)) => Ok(payload.into()),
        Err(rejection) => {
            tracing::warn!("Rejected user payload: {}", rejection.body_text());
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

#[tracing::instrument(skip_all)]
async fn create_user_handler(
    State(state): State<AppState>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let new_user = user_payload(body)?;

    let id = state
        .repo
        .create_user(&new_user)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to create user"))?;

    tracing::info!("Created user {} ({})", id, new_user);
    Ok(Json(CreatedResponse { success: true, id }))
}

#[tracing::instrument(skip_all)]
async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .repo
        .list_users()
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to fetch users"))?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(JsonUser::from).collect(),
    }))
}

#[tracing::instrument(skip_all)]
async fn get_user_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = user_id(path)?;

    let user = state
        .repo
        .get_user(id)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to fetch user"))?;

    Ok(Json(UserResponse { user: user.into() }))
}

#[tracing::instrument(skip_all)]
async fn update_user_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = user_id(path)?;
    let new_user = user_payload(body)?;

    state
        .repo
        .update_user(id, &new_user)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to update user"))?;

    tracing::info!("Updated user {}", id);
    Ok(Json(SuccessResponse { success: true }))
}

#[tracing::instrument(skip_all)]
async fn delete_user_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = user_id(path)?;

    state
        .repo
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to delete user"))?;

    tracing::info!("Deleted user {}", id);
    Ok(Json(SuccessResponse { success: true }))
}
