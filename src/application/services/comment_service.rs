//! Comment service for comments nested under reviews.

use serde_json::json;
use std::sync::Arc;

use super::review_service::ensure_can_manage;
use crate::domain::entities::{Comment, NewComment, User};
use crate::domain::repositories::{CommentRepository, ReviewRepository};
use crate::error::AppError;

/// Service for comments. Every operation first checks that the review exists
/// under the given title.
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { comments, reviews }
    }

    pub async fn list_comments(
        &self,
        title_id: i64,
        review_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64), AppError> {
        self.ensure_review(title_id, review_id).await?;
        self.comments.list_for_review(review_id, offset, limit).await
    }

    pub async fn get_comment(
        &self,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> Result<Comment, AppError> {
        self.ensure_review(title_id, review_id).await?;
        self.comments
            .find(review_id, comment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Comment not found", json!({"comment_id": comment_id}))
            })
    }

    pub async fn create_comment(
        &self,
        title_id: i64,
        review_id: i64,
        author: &User,
        text: String,
    ) -> Result<Comment, AppError> {
        self.ensure_review(title_id, review_id).await?;

        self.comments
            .create(NewComment {
                review_id,
                author_id: author.id,
                text,
            })
            .await
    }

    /// Replaces a comment's text. Only its author, moderators and admins may do so.
    pub async fn update_comment(
        &self,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
        actor: &User,
        text: String,
    ) -> Result<Comment, AppError> {
        let comment = self.get_comment(title_id, review_id, comment_id).await?;
        ensure_can_manage(actor, comment.author_id)?;

        self.comments.update(comment.id, text).await
    }

    pub async fn delete_comment(
        &self,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
        actor: &User,
    ) -> Result<(), AppError> {
        let comment = self.get_comment(title_id, review_id, comment_id).await?;
        ensure_can_manage(actor, comment.author_id)?;

        self.comments.delete(comment.id).await
    }

    async fn ensure_review(&self, title_id: i64, review_id: i64) -> Result<(), AppError> {
        match self.reviews.find(title_id, review_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(
                "Review not found",
                json!({"title_id": title_id, "review_id": review_id}),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Review, Role};
    use crate::domain::repositories::{MockCommentRepository, MockReviewRepository};
    use chrono::Utc;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
            confirmation_key: "KEY".to_string(),
            password_hash: None,
            created_at: Utc::now(),
        }
    }

    fn comment(id: i64, author_id: i64) -> Comment {
        Comment {
            id,
            review_id: 2,
            author_id,
            author_username: format!("user{author_id}"),
            text: "Agreed".to_string(),
            pub_date: Utc::now(),
        }
    }

    fn review_exists() -> MockReviewRepository {
        let mut reviews = MockReviewRepository::new();
        reviews.expect_find().returning(|title_id, review_id| {
            Ok(Some(Review {
                id: review_id,
                title_id,
                author_id: 1,
                author_username: "user1".to_string(),
                text: "Review".to_string(),
                score: 7,
                pub_date: Utc::now(),
            }))
        });
        reviews
    }

    #[tokio::test]
    async fn test_create_comment() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_create()
            .withf(|c| c.review_id == 2 && c.author_id == 5)
            .times(1)
            .returning(|_| Ok(comment(1, 5)));

        let service = CommentService::new(Arc::new(comments), Arc::new(review_exists()));
        let created = service
            .create_comment(1, 2, &user(5, Role::User), "Agreed".to_string())
            .await
            .unwrap();

        assert_eq!(created.author_username, "user5");
    }

    #[tokio::test]
    async fn test_comment_on_review_of_other_title() {
        let mut reviews = MockReviewRepository::new();
        reviews.expect_find().returning(|_, _| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_create().times(0);

        let service = CommentService::new(Arc::new(comments), Arc::new(reviews));
        let err = service
            .create_comment(1, 2, &user(5, Role::User), "x".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_author_can_edit_comment() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find()
            .returning(|_, id| Ok(Some(comment(id, 5))));
        comments
            .expect_update()
            .withf(|id, text| *id == 4 && text == "Edited")
            .times(1)
            .returning(|_, _| Ok(comment(4, 5)));

        let service = CommentService::new(Arc::new(comments), Arc::new(review_exists()));
        let result = service
            .update_comment(1, 2, 4, &user(5, Role::User), "Edited".to_string())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete_comment() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find()
            .returning(|_, id| Ok(Some(comment(id, 5))));
        comments.expect_delete().times(0);

        let service = CommentService::new(Arc::new(comments), Arc::new(review_exists()));
        let err = service
            .delete_comment(1, 2, 4, &user(6, Role::User))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }
}
