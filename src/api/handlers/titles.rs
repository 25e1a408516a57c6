//! Handlers for title endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::pagination::Page;
use crate::api::dto::title::{CreateTitleRequest, TitleListQuery, TitleResponse, UpdateTitleRequest};
use crate::api::middleware::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists titles.
///
/// # Endpoint
///
/// `GET /api/v1/titles`
///
/// # Query Parameters
///
/// - `category` - category slug
/// - `genre` - genre slug
/// - `name` - substring of the name, case-insensitive
/// - `year` - exact release year
/// - `page`, `page_size`
pub async fn list_titles_handler(
    State(state): State<AppState>,
    Query(query): Query<TitleListQuery>,
) -> Result<Json<Page<TitleResponse>>, AppError> {
    let (offset, limit) = query.pagination.offset_limit()?;
    let page = state
        .title_service
        .list_titles(query.filter(), offset, limit)
        .await?;

    Ok(Json(Page::from_parts(page)))
}

/// Creates a title.
///
/// # Endpoint
///
/// `POST /api/v1/titles` (admin)
///
/// # Request Body
///
/// ```json
/// { "name": "Heat", "year": 1995, "category": "films", "genre": ["crime", "drama"] }
/// ```
///
/// # Errors
///
/// Returns 400 with `"<slug> category does not exist"` or
/// `"<slug> genre does not exist"` for unknown references, or if the year is
/// in the future.
pub async fn create_title_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateTitleRequest>,
) -> Result<(StatusCode, Json<TitleResponse>), AppError> {
    payload.validate()?;

    let title = state.title_service.create_title(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(title.into())))
}

/// `GET /api/v1/titles/{id}`
pub async fn get_title_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TitleResponse>, AppError> {
    let title = state.title_service.get_title(id).await?;
    Ok(Json(title.into()))
}

/// `PATCH /api/v1/titles/{id}` (admin)
pub async fn update_title_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTitleRequest>,
) -> Result<Json<TitleResponse>, AppError> {
    payload.validate()?;

    let title = state.title_service.update_title(id, payload.into()).await?;
    Ok(Json(title.into()))
}

/// `DELETE /api/v1/titles/{id}` (admin)
///
/// Reviews and their comments are deleted with the title.
pub async fn delete_title_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.title_service.delete_title(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
