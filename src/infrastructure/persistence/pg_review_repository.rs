//! PostgreSQL implementation of review repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewReview, Review, ReviewChanges};
use crate::domain::repositories::ReviewRepository;
use crate::error::AppError;

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.title_id, r.author_id, u.username AS author_username,
           r.text, r.score, r.pub_date
    FROM reviews r
    JOIN users u ON u.id = r.author_id
"#;

#[derive(FromRow)]
struct ReviewRow {
    id: i64,
    title_id: i64,
    author_id: i64,
    author_username: String,
    text: String,
    score: i32,
    pub_date: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            title_id: row.title_id,
            author_id: row.author_id,
            author_username: row.author_username,
            text: row.text,
            score: row.score,
            pub_date: row.pub_date,
        }
    }
}

/// PostgreSQL repository for reviews.
///
/// The `(title_id, author_id)` unique constraint backs the one review per
/// author rule; a violation surfaces as [`AppError::Conflict`].
pub struct PgReviewRepository {
    pool: Arc<PgPool>,
}

impl PgReviewRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Review>, AppError> {
        let sql = format!("{REVIEW_SELECT} WHERE r.id = $1");
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (title_id, author_id, text, score)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(new_review.title_id)
        .bind(new_review.author_id)
        .bind(&new_review.text)
        .bind(new_review.score)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Review vanished after insert", json!({"id": id})))
    }

    async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, AppError> {
        let sql = format!("{REVIEW_SELECT} WHERE r.id = $1 AND r.title_id = $2");
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_for_author(&self, title_id: i64, author_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list_for_title(
        &self,
        title_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Review>, i64), AppError> {
        let sql = format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 ORDER BY r.pub_date DESC, r.id DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE reviews SET
                text  = COALESCE($2, text),
                score = COALESCE($3, score)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.text)
        .bind(changes.score)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Review not found", json!({"id": id})));
        }

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found", json!({"id": id})))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Review not found", json!({"id": id})));
        }

        Ok(())
    }
}
