//! PostgreSQL implementation of comment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Comment, NewComment};
use crate::domain::repositories::CommentRepository;
use crate::error::AppError;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.review_id, c.author_id, u.username AS author_username,
           c.text, c.pub_date
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    review_id: i64,
    author_id: i64,
    author_username: String,
    text: String,
    pub_date: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            review_id: row.review_id,
            author_id: row.author_id,
            author_username: row.author_username,
            text: row.text,
            pub_date: row.pub_date,
        }
    }
}

/// PostgreSQL repository for comments.
pub struct PgCommentRepository {
    pool: Arc<PgPool>,
}

impl PgCommentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (review_id, author_id, text) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_comment.review_id)
        .bind(new_comment.author_id)
        .bind(&new_comment.text)
        .fetch_one(self.pool.as_ref())
        .await?;

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Comment vanished after insert", json!({"id": id})))
    }

    async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, AppError> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = $1 AND c.review_id = $2");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_for_review(
        &self,
        review_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Comment>, i64), AppError> {
        let sql = format!(
            "{COMMENT_SELECT} WHERE c.review_id = $1 ORDER BY c.pub_date, c.id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: i64, text: String) -> Result<Comment, AppError> {
        let result = sqlx::query("UPDATE comments SET text = $2 WHERE id = $1")
            .bind(id)
            .bind(&text)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Comment not found", json!({"id": id})));
        }

        self.fetch_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found", json!({"id": id})))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Comment not found", json!({"id": id})));
        }

        Ok(())
    }
}
