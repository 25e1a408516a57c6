//! Repository trait for titles.

use crate::domain::entities::{NewTitle, Title, TitleChanges, TitleFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for titles.
///
/// Every returned [`Title`] carries its expanded category, its genres in
/// insertion order, and the average review score.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTitleRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleRepository: Send + Sync {
    /// Creates a title and links its genres.
    async fn create(&self, new_title: NewTitle) -> Result<Title, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Title>, AppError>;

    /// Lists titles ordered by id. Returns the page and the total number of matches.
    async fn list(
        &self,
        filter: TitleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Title>, i64), AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    async fn update(&self, id: i64, changes: TitleChanges) -> Result<Title, AppError>;

    /// Deletes a title with its reviews and their comments.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
