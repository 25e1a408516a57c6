//! Handlers for genre endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::category::TagListQuery;
use crate::api::dto::genre::GenreDto;
use crate::api::dto::pagination::Page;
use crate::api::middleware::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/genres`
pub async fn list_genres_handler(
    State(state): State<AppState>,
    Query(query): Query<TagListQuery>,
) -> Result<Json<Page<GenreDto>>, AppError> {
    let (offset, limit) = query.pagination.offset_limit()?;
    let page = state
        .genre_service
        .list_genres(query.search, offset, limit)
        .await?;

    Ok(Json(Page::from_parts(page)))
}

/// `POST /api/v1/genres` (admin)
pub async fn create_genre_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<GenreDto>,
) -> Result<(StatusCode, Json<GenreDto>), AppError> {
    payload.validate()?;

    let genre = state
        .genre_service
        .create_genre(payload.name, payload.slug)
        .await?;

    Ok((StatusCode::CREATED, Json(genre.into())))
}

/// `DELETE /api/v1/genres/{slug}` (admin)
pub async fn delete_genre_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.genre_service.delete_genre(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
