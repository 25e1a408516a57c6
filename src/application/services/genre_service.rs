//! Genre management service.

use serde_json::json;
use std::sync::Arc;

use super::category_service::{BLANK_SLUG, DUPLICATE_SLUG};
use crate::domain::entities::{Genre, NewGenre};
use crate::domain::repositories::GenreRepository;
use crate::error::AppError;

/// Service for managing genres. Same slug rules as categories.
pub struct GenreService {
    repository: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(repository: Arc<dyn GenreRepository>) -> Self {
        Self { repository }
    }

    /// Creates a genre.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the slug is blank or already in use.
    pub async fn create_genre(&self, name: String, slug: String) -> Result<Genre, AppError> {
        if slug.trim().is_empty() {
            return Err(AppError::field("slug", BLANK_SLUG));
        }

        if self.repository.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::field("slug", DUPLICATE_SLUG));
        }

        let genre = self.repository.create(NewGenre { name, slug }).await?;
        tracing::info!(slug = %genre.slug, "Genre created");

        Ok(genre)
    }

    pub async fn list_genres(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Genre>, i64), AppError> {
        self.repository.list(search, offset, limit).await
    }

    pub async fn delete_genre(&self, slug: &str) -> Result<(), AppError> {
        let genre = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Genre not found", json!({"slug": slug})))?;

        self.repository.delete(genre.id).await
    }
}
