//! PostgreSQL implementation of title repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Category, Genre, NewTitle, Title, TitleChanges, TitleFilter};
use crate::domain::repositories::TitleRepository;
use crate::error::AppError;

/// Title columns joined with the category and the derived rating.
const TITLE_SELECT: &str = r#"
    SELECT t.id, t.name, t.year, t.description,
           c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
           (SELECT AVG(r.score)::FLOAT8 FROM reviews r WHERE r.title_id = t.id) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

/// Filter shared by the page query and the count query.
const TITLE_FILTER: &str = r#"
    WHERE ($1::TEXT IS NULL OR c.slug = $1)
      AND ($2::TEXT IS NULL OR EXISTS (
            SELECT 1 FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = t.id AND g.slug = $2))
      AND ($3::TEXT IS NULL OR t.name ILIKE '%' || $3 || '%')
      AND ($4::INT IS NULL OR t.year = $4)
"#;

#[derive(FromRow)]
struct TitleRow {
    id: i64,
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_slug: Option<String>,
    rating: Option<f64>,
}

#[derive(FromRow)]
struct TitleGenreRow {
    title_id: i64,
    id: i64,
    name: String,
    slug: String,
}

impl TitleRow {
    fn into_title(self, genres: Vec<Genre>) -> Title {
        let category = match (self.category_id, self.category_name, self.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
        };

        Title {
            id: self.id,
            name: self.name,
            year: self.year,
            description: self.description,
            rating: self.rating,
            category,
            genres,
        }
    }
}

/// PostgreSQL repository for titles.
///
/// Genres live in the `title_genres` join table with a `position` column so
/// they come back in the order they were assigned.
pub struct PgTitleRepository {
    pool: Arc<PgPool>,
}

impl PgTitleRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads the genres of several titles in one query, keyed by title id.
    async fn genres_for(&self, title_ids: &[i64]) -> Result<HashMap<i64, Vec<Genre>>, AppError> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TitleGenreRow>(
            r#"
            SELECT tg.title_id, g.id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY tg.title_id, tg.position
            "#,
        )
        .bind(title_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_title: HashMap<i64, Vec<Genre>> = HashMap::new();
        for row in rows {
            by_title.entry(row.title_id).or_default().push(Genre {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }

        Ok(by_title)
    }

    async fn replace_genres(
        tx: &mut Transaction<'_, Postgres>,
        title_id: i64,
        genre_ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut **tx)
            .await?;

        // Repeated genre ids collapse to their first position.
        sqlx::query(
            r#"
            INSERT INTO title_genres (title_id, genre_id, position)
            SELECT $1, u.genre_id, u.position
            FROM UNNEST($2::BIGINT[]) WITH ORDINALITY AS u(genre_id, position)
            ON CONFLICT (title_id, genre_id) DO NOTHING
            "#,
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl TitleRepository for PgTitleRepository {
    async fn create(&self, new_title: NewTitle) -> Result<Title, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_title.name)
        .bind(new_title.year)
        .bind(&new_title.description)
        .bind(new_title.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_genres(&mut tx, id, &new_title.genre_ids).await?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::internal("Title vanished after insert", json!({"id": id}))
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Title>, AppError> {
        let sql = format!("{TITLE_SELECT} WHERE t.id = $1");
        let Some(row) = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let mut genres = self.genres_for(&[id]).await?;
        Ok(Some(row.into_title(genres.remove(&id).unwrap_or_default())))
    }

    async fn list(
        &self,
        filter: TitleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Title>, i64), AppError> {
        let sql = format!("{TITLE_SELECT} {TITLE_FILTER} ORDER BY t.id LIMIT $5 OFFSET $6");
        let rows = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM titles t LEFT JOIN categories c ON c.id = t.category_id {TITLE_FILTER}"
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(&filter.name)
            .bind(filter.year)
            .fetch_one(self.pool.as_ref())
            .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut genres = self.genres_for(&ids).await?;

        let titles = rows
            .into_iter()
            .map(|row| {
                let title_genres = genres.remove(&row.id).unwrap_or_default();
                row.into_title(title_genres)
            })
            .collect();

        Ok((titles, total))
    }

    async fn update(&self, id: i64, changes: TitleChanges) -> Result<Title, AppError> {
        let mut tx = self.pool.begin().await?;

        let update_description = changes.description.is_some();
        let new_description = changes.description.and_then(|v| v);
        let update_category = changes.category_id.is_some();
        let new_category = changes.category_id.and_then(|v| v);

        let result = sqlx::query(
            r#"
            UPDATE titles SET
                name        = COALESCE($2, name),
                year        = COALESCE($3, year),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(changes.year)
        .bind(update_description)
        .bind(&new_description)
        .bind(update_category)
        .bind(new_category)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found("Title not found", json!({"id": id})));
        }

        if let Some(genre_ids) = &changes.genre_ids {
            Self::replace_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Title not found", json!({"id": id})))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Title not found", json!({"id": id})));
        }

        Ok(())
    }
}
