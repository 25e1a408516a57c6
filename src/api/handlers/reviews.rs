//! Handlers for reviews nested under titles.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::pagination::{Page, PaginationParams};
use crate::api::dto::review::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/titles/{title_id}/reviews`
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Page<ReviewResponse>>, AppError> {
    let (offset, limit) = pagination.offset_limit()?;
    let page = state
        .review_service
        .list_reviews(title_id, offset, limit)
        .await?;

    Ok(Json(Page::from_parts(page)))
}

/// Publishes the caller's review of a title.
///
/// # Endpoint
///
/// `POST /api/v1/titles/{title_id}/reviews`
///
/// The author is the authenticated caller and the title comes from the path;
/// both are ignored if present in the body.
///
/// # Errors
///
/// - **400**: score outside 1..=10, or the caller already reviewed this title
/// - **401**: no valid bearer token
/// - **404**: unknown title
pub async fn create_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(title_id): Path<i64>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    payload.validate()?;

    let review = state
        .review_service
        .create_review(title_id, &user, payload.text, payload.score)
        .await?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}`
pub async fn get_review_handler(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state.review_service.get_review(title_id, review_id).await?;
    Ok(Json(review.into()))
}

/// `PATCH /api/v1/titles/{title_id}/reviews/{review_id}` (author, moderator or admin)
pub async fn update_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    payload.validate()?;

    let review = state
        .review_service
        .update_review(title_id, review_id, &user, payload.into())
        .await?;

    Ok(Json(review.into()))
}

/// `DELETE /api/v1/titles/{title_id}/reviews/{review_id}` (author, moderator or admin)
pub async fn delete_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .review_service
        .delete_review(title_id, review_id, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
