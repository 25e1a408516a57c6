//! Repository trait for comments.

use crate::domain::entities::{Comment, NewComment};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for comments on reviews.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCommentRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, AppError>;

    /// Finds a comment by id within a review.
    async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, AppError>;

    /// Lists a review's comments, oldest first.
    async fn list_for_review(
        &self,
        review_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64), AppError>;

    /// Replaces the comment text.
    async fn update(&self, id: i64, text: String) -> Result<Comment, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
