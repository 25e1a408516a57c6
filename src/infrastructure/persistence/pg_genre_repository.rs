//! PostgreSQL implementation of genre repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Genre, NewGenre};
use crate::domain::repositories::GenreRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct GenreRow {
    id: i64,
    name: String,
    slug: String,
}

impl From<GenreRow> for Genre {
    fn from(row: GenreRow) -> Self {
        Genre {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

/// PostgreSQL repository for genres.
pub struct PgGenreRepository {
    pool: Arc<PgPool>,
}

impl PgGenreRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepository for PgGenreRepository {
    async fn create(&self, new_genre: NewGenre) -> Result<Genre, AppError> {
        let row = sqlx::query_as::<_, GenreRow>(
            "INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(&new_genre.name)
        .bind(&new_genre.slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, AppError> {
        let row = sqlx::query_as::<_, GenreRow>(
            "SELECT id, name, slug FROM genres WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Genre>, i64), AppError> {
        let rows = sqlx::query_as::<_, GenreRow>(
            r#"
            SELECT id, name, slug
            FROM genres
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM genres WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(&search)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Genre not found", json!({"id": id})));
        }

        Ok(())
    }
}
