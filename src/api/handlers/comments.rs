//! Handlers for comments nested under reviews.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::comment::{CommentRequest, CommentResponse};
use crate::api::dto::pagination::{Page, PaginationParams};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/comments`
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Page<CommentResponse>>, AppError> {
    let (offset, limit) = pagination.offset_limit()?;
    let page = state
        .comment_service
        .list_comments(title_id, review_id, offset, limit)
        .await?;

    Ok(Json(Page::from_parts(page)))
}

/// `POST /api/v1/titles/{title_id}/reviews/{review_id}/comments`
///
/// The author is the authenticated caller.
pub async fn create_comment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    payload.validate()?;

    let comment = state
        .comment_service
        .create_comment(title_id, review_id, &user, payload.text)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub async fn get_comment_handler(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .comment_service
        .get_comment(title_id, review_id, comment_id)
        .await?;

    Ok(Json(comment.into()))
}

/// `PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub async fn update_comment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    payload.validate()?;

    let comment = state
        .comment_service
        .update_comment(title_id, review_id, comment_id, &user, payload.text)
        .await?;

    Ok(Json(comment.into()))
}

/// `DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .comment_service
        .delete_comment(title_id, review_id, comment_id, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
