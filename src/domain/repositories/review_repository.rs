//! Repository trait for reviews.

use crate::domain::entities::{NewReview, Review, ReviewChanges};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for reviews.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReviewRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Creates a review.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the author already reviewed the title.
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError>;

    /// Finds a review by id within a title.
    async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, AppError>;

    /// Returns true if `author_id` already reviewed `title_id`.
    async fn exists_for_author(&self, title_id: i64, author_id: i64) -> Result<bool, AppError>;

    /// Lists a title's reviews, newest first.
    async fn list_for_title(
        &self,
        title_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Review>, i64), AppError>;

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review, AppError>;

    /// Deletes a review with its comments.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
