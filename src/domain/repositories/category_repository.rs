//! Repository trait for categories.

use crate::domain::entities::{Category, NewCategory};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for categories.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCategoryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, AppError>;

    /// Lists categories ordered by name, optionally filtered by a name substring.
    async fn list(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Category>, i64), AppError>;

    /// Deletes a category. Titles referencing it lose their category.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
