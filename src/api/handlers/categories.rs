//! Handlers for category endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::category::{CategoryDto, TagListQuery};
use crate::api::dto::pagination::Page;
use crate::api::middleware::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists categories, optionally filtered by name.
///
/// # Endpoint
///
/// `GET /api/v1/categories?search=<name>&page=<n>&page_size=<n>`
pub async fn list_categories_handler(
    State(state): State<AppState>,
    Query(query): Query<TagListQuery>,
) -> Result<Json<Page<CategoryDto>>, AppError> {
    let (offset, limit) = query.pagination.offset_limit()?;
    let page = state
        .category_service
        .list_categories(query.search, offset, limit)
        .await?;

    Ok(Json(Page::from_parts(page)))
}

/// Creates a category.
///
/// # Endpoint
///
/// `POST /api/v1/categories` (admin)
///
/// # Errors
///
/// Returns 400 if the slug is blank, malformed, or already used.
pub async fn create_category_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CategoryDto>,
) -> Result<(StatusCode, Json<CategoryDto>), AppError> {
    payload.validate()?;

    let category = state
        .category_service
        .create_category(payload.name, payload.slug)
        .await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// `DELETE /api/v1/categories/{slug}` (admin)
///
/// Titles in the category keep existing with no category.
pub async fn delete_category_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete_category(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
