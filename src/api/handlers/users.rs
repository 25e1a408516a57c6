//! Handlers for account administration and the caller's own profile.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::pagination::Page;
use crate::api::dto::user::{CreateUserRequest, UpdateUserRequest, UserListQuery, UserResponse};
use crate::api::middleware::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/users` (admin)
pub async fn list_users_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let (offset, limit) = query.pagination.offset_limit()?;
    let page = state
        .user_service
        .list_users(query.search, offset, limit)
        .await?;

    Ok(Json(Page::from_parts(page)))
}

/// `POST /api/v1/users` (admin)
///
/// # Errors
///
/// Returns 400 if the username or email is taken.
pub async fn create_user_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state.user_service.create_user(payload.into()).await?;
    tracing::info!(admin_id = admin.id, user_id = user.id, "Account created by admin");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /api/v1/users/{username}` (admin)
pub async fn get_user_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_user(&username).await?;
    Ok(Json(user.into()))
}

/// `PATCH /api/v1/users/{username}` (admin)
pub async fn update_user_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let user = state
        .user_service
        .update_user(&username, payload.into())
        .await?;

    Ok(Json(user.into()))
}

/// `DELETE /api/v1/users/{username}` (admin)
pub async fn delete_user_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    state.user_service.delete_user(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/users/me`
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// `PATCH /api/v1/users/me`
///
/// A `role` in the body is ignored.
pub async fn update_me_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .user_service
        .update_own_profile(&user, payload.into())
        .await?;

    Ok(Json(updated.into()))
}
