//! Category management service.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Category, NewCategory};
use crate::domain::repositories::CategoryRepository;
use crate::error::AppError;

pub(crate) const BLANK_SLUG: &str = "This field may not be blank.";
pub(crate) const DUPLICATE_SLUG: &str = "This field must be unique.";

/// Service for managing categories.
///
/// Slugs are checked for blankness and uniqueness before anything reaches
/// storage; the database unique constraint still guards concurrent inserts.
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the slug is blank or already in use.
    pub async fn create_category(&self, name: String, slug: String) -> Result<Category, AppError> {
        if slug.trim().is_empty() {
            return Err(AppError::field("slug", BLANK_SLUG));
        }

        if self.repository.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::field("slug", DUPLICATE_SLUG));
        }

        let category = self.repository.create(NewCategory { name, slug }).await?;
        tracing::info!(slug = %category.slug, "Category created");

        Ok(category)
    }

    pub async fn list_categories(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64), AppError> {
        self.repository.list(search, offset, limit).await
    }

    /// Deletes a category by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    pub async fn delete_category(&self, slug: &str) -> Result<(), AppError> {
        let category = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found", json!({"slug": slug})))?;

        self.repository.delete(category.id).await
    }
}
