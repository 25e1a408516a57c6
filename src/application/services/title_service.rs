//! Title management service, including category/genre reference resolution.

use chrono::{Datelike, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Category, Genre, NewTitle, Title, TitleChanges, TitleFilter};
use crate::domain::repositories::{CategoryRepository, GenreRepository, TitleRepository};
use crate::error::AppError;

/// Fields supplied when creating a title. References are slugs.
#[derive(Debug, Clone)]
pub struct TitleDraft {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Vec<String>,
}

/// Partial update of a title. References are slugs.
///
/// `category: Some(None)` detaches the category; `genre: Some(..)` replaces
/// the genre list.
#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

/// Service for managing catalog titles.
pub struct TitleService {
    titles: Arc<dyn TitleRepository>,
    categories: Arc<dyn CategoryRepository>,
    genres: Arc<dyn GenreRepository>,
}

impl TitleService {
    pub fn new(
        titles: Arc<dyn TitleRepository>,
        categories: Arc<dyn CategoryRepository>,
        genres: Arc<dyn GenreRepository>,
    ) -> Self {
        Self {
            titles,
            categories,
            genres,
        }
    }

    /// Resolves a category slug and a list of genre slugs to stored records.
    ///
    /// A missing category slug resolves to `None`. Genres are resolved in input
    /// order with duplicates kept; the first unknown genre slug fails the whole
    /// call and the remaining slugs are not looked up.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with `"<slug> category does not exist"`
    /// or `"<slug> genre does not exist"`.
    pub async fn check_category_genre(
        &self,
        category: Option<&str>,
        genre: &[String],
    ) -> Result<(Option<Category>, Vec<Genre>), AppError> {
        let real_category = match category {
            Some(slug) => Some(self.categories.find_by_slug(slug).await?.ok_or_else(|| {
                AppError::field("category", format!("{slug} category does not exist"))
            })?),
            None => None,
        };

        let mut genres = Vec::with_capacity(genre.len());
        for slug in genre {
            match self.genres.find_by_slug(slug).await? {
                Some(found) => genres.push(found),
                None => {
                    return Err(AppError::field(
                        "genre",
                        format!("{slug} genre does not exist"),
                    ));
                }
            }
        }

        Ok((real_category, genres))
    }

    /// Creates a title after resolving its references.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the year is in the future or a
    /// reference does not resolve.
    pub async fn create_title(&self, draft: TitleDraft) -> Result<Title, AppError> {
        validate_year(draft.year)?;

        let (category, genres) = self
            .check_category_genre(draft.category.as_deref(), &draft.genre)
            .await?;

        let title = self
            .titles
            .create(NewTitle {
                name: draft.name,
                year: draft.year,
                description: draft.description,
                category_id: category.map(|c| c.id),
                genre_ids: genres.iter().map(|g| g.id).collect(),
            })
            .await?;

        tracing::info!(title_id = title.id, "Title created");
        Ok(title)
    }

    /// Retrieves a title by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    pub async fn get_title(&self, id: i64) -> Result<Title, AppError> {
        self.titles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Title not found", json!({"id": id})))
    }

    pub async fn list_titles(
        &self,
        filter: TitleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Title>, i64), AppError> {
        self.titles.list(filter, offset, limit).await
    }

    /// Applies a partial update, resolving any changed references.
    pub async fn update_title(&self, id: i64, patch: TitlePatch) -> Result<Title, AppError> {
        self.get_title(id).await?;

        if let Some(year) = patch.year {
            validate_year(year)?;
        }

        let category_slug = patch.category.as_ref().and_then(|c| c.as_deref());
        let genre_slugs = patch.genre.as_deref().unwrap_or_default();
        let (category, genres) = self.check_category_genre(category_slug, genre_slugs).await?;

        let changes = TitleChanges {
            name: patch.name,
            year: patch.year,
            description: patch.description,
            category_id: patch.category.map(|_| category.map(|c| c.id)),
            genre_ids: patch
                .genre
                .map(|_| genres.iter().map(|g| g.id).collect()),
        };

        self.titles.update(id, changes).await
    }

    pub async fn delete_title(&self, id: i64) -> Result<(), AppError> {
        self.get_title(id).await?;
        self.titles.delete(id).await?;
        tracing::info!(title_id = id, "Title deleted");
        Ok(())
    }
}

fn validate_year(year: i32) -> Result<(), AppError> {
    let current = Utc::now().year();
    if year > current {
        return Err(AppError::field(
            "year",
            format!("Year cannot be later than {current}"),
        ));
    }
    Ok(())
}
