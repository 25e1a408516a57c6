//! Review service: one review per author and title, edits by author or staff.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewReview, Review, ReviewChanges, User};
use crate::domain::repositories::{ReviewRepository, TitleRepository};
use crate::error::AppError;

/// Inclusive bounds of a review score.
pub const SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// Service for reviews nested under titles.
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    titles: Arc<dyn TitleRepository>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, titles: Arc<dyn TitleRepository>) -> Self {
        Self { reviews, titles }
    }

    /// Lists a title's reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    pub async fn list_reviews(
        &self,
        title_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Review>, i64), AppError> {
        self.ensure_title(title_id).await?;
        self.reviews.list_for_title(title_id, offset, limit).await
    }

    /// Retrieves a review belonging to a title.
    pub async fn get_review(&self, title_id: i64, review_id: i64) -> Result<Review, AppError> {
        self.reviews
            .find(title_id, review_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Review not found",
                    json!({"title_id": title_id, "review_id": review_id}),
                )
            })
    }

    /// Publishes a review by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    /// Returns [`AppError::Validation`] if the score is out of range or the
    /// author already reviewed this title.
    pub async fn create_review(
        &self,
        title_id: i64,
        author: &User,
        text: String,
        score: i32,
    ) -> Result<Review, AppError> {
        validate_score(score)?;
        self.ensure_title(title_id).await?;

        if self.reviews.exists_for_author(title_id, author.id).await? {
            return Err(AppError::bad_request(
                "You have already reviewed this title",
                json!({"title_id": title_id}),
            ));
        }

        let review = self
            .reviews
            .create(NewReview {
                title_id,
                author_id: author.id,
                text,
                score,
            })
            .await?;

        tracing::info!(review_id = review.id, title_id, "Review published");
        Ok(review)
    }

    /// Edits a review. Only its author, moderators and admins may do so.
    pub async fn update_review(
        &self,
        title_id: i64,
        review_id: i64,
        actor: &User,
        changes: ReviewChanges,
    ) -> Result<Review, AppError> {
        if let Some(score) = changes.score {
            validate_score(score)?;
        }

        let review = self.get_review(title_id, review_id).await?;
        ensure_can_manage(actor, review.author_id)?;

        self.reviews.update(review.id, changes).await
    }

    /// Deletes a review. Only its author, moderators and admins may do so.
    pub async fn delete_review(
        &self,
        title_id: i64,
        review_id: i64,
        actor: &User,
    ) -> Result<(), AppError> {
        let review = self.get_review(title_id, review_id).await?;
        ensure_can_manage(actor, review.author_id)?;

        self.reviews.delete(review.id).await
    }

    async fn ensure_title(&self, title_id: i64) -> Result<(), AppError> {
        match self.titles.find_by_id(title_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(
                "Title not found",
                json!({"id": title_id}),
            )),
        }
    }
}

fn validate_score(score: i32) -> Result<(), AppError> {
    if !SCORE_RANGE.contains(&score) {
        return Err(AppError::field(
            "score",
            format!(
                "Score must be between {} and {}",
                SCORE_RANGE.start(),
                SCORE_RANGE.end()
            ),
        ));
    }
    Ok(())
}

/// Fails with [`AppError::Forbidden`] unless `actor` may manage content of `author_id`.
pub(crate) fn ensure_can_manage(actor: &User, author_id: i64) -> Result<(), AppError> {
    if actor.can_manage_content_of(author_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "You do not have permission to perform this action",
            json!({}),
        ))
    }
}
