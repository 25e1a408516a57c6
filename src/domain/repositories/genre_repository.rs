//! Repository trait for genres.

use crate::domain::entities::{Genre, NewGenre};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for genres.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgGenreRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Creates a genre.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    async fn create(&self, new_genre: NewGenre) -> Result<Genre, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, AppError>;

    /// Lists genres ordered by name, optionally filtered by a name substring.
    async fn list(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Genre>, i64), AppError>;

    /// Deletes a genre. Titles referencing it drop the genre.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
