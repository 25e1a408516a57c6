//! DTOs for title endpoints.
//!
//! Titles are read with their category and genres expanded, and written with
//! references given as slugs.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use super::category::CategoryDto;
use super::genre::GenreDto;
use super::pagination::PaginationParams;
use crate::application::services::{TitleDraft, TitlePatch};
use crate::domain::entities::{Title, TitleFilter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: i32,
    /// Average review score, `null` until the title is reviewed.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub category: Option<CategoryDto>,
    pub genre: Vec<GenreDto>,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            rating: title.rating,
            description: title.description,
            category: title.category.map(Into::into),
            genre: title.genres.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    pub year: i32,

    pub description: Option<String>,

    /// Category slug.
    pub category: Option<String>,

    /// Genre slugs.
    #[serde(default)]
    pub genre: Vec<String>,
}

impl From<CreateTitleRequest> for TitleDraft {
    fn from(req: CreateTitleRequest) -> Self {
        Self {
            name: req.name,
            year: req.year,
            description: req.description,
            category: req.category,
            genre: req.genre,
        }
    }
}

/// Partial update. An explicit `null` clears `description` or `category`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    pub year: Option<i32>,

    #[serde(default, with = "serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, with = "serde_with::rust::double_option")]
    pub category: Option<Option<String>>,

    pub genre: Option<Vec<String>>,
}

impl From<UpdateTitleRequest> for TitlePatch {
    fn from(req: UpdateTitleRequest) -> Self {
        Self {
            name: req.name,
            year: req.year,
            description: req.description,
            category: req.category,
            genre: req.genre,
        }
    }
}

/// Title list filters.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct TitleListQuery {
    /// Category slug.
    pub category: Option<String>,

    /// Genre slug.
    pub genre: Option<String>,

    /// Substring of the name.
    pub name: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub year: Option<i32>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl TitleListQuery {
    pub fn filter(&self) -> TitleFilter {
        TitleFilter {
            category: self.category.clone(),
            genre: self.genre.clone(),
            name: self.name.clone(),
            year: self.year,
        }
    }
}
