//! User resource API handlers
//!
//! List, create, update and delete endpoints on `/users`.
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{CreateUserRequest, DeleteUserRequest, UpdateUserRequest, UserDto};
use crate::application::identity::UserService;
use crate::interfaces::http::common::{ApiError, MessageResponse, ValidatedJson};

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
        (status = 400, description = "No users found", body = MessageResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.user_service.list_users().await?;

    if users.is_empty() {
        return Err(ApiError::bad_request("No users found"));
    }

    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid user data", body = MessageResponse),
        (status = 409, description = "Duplicate user", body = MessageResponse)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user = state.user_service.create_user(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "New user {} created",
            user.first_name
        ))),
    ))
}

#[utoipa::path(
    patch,
    path = "/users",
    tag = "Users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Missing fields or user not found", body = MessageResponse),
        (status = 409, description = "Duplicate user", body = MessageResponse)
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = state.user_service.update_user(request.into()).await?;

    Ok(Json(MessageResponse::new(format!(
        "{} updated",
        user.first_name
    ))))
}

#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "Textual confirmation", body = String),
        (status = 400, description = "Missing id or user not found", body = MessageResponse)
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<DeleteUserRequest>,
) -> Result<Json<String>, ApiError> {
    let user = state.user_service.delete_user(request.id.as_deref()).await?;

    Ok(Json(format!(
        "Username {} with ID {} deleted",
        user.first_name, user.id
    )))
}
