//! Title entity: a catalog item with its category, genres and derived rating.

use super::{Category, Genre};

/// A catalog item.
///
/// `rating` is the average review score and is `None` until the title has
/// at least one review. It is never written directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
}

/// Input data for creating a title.
///
/// Category and genre references are already resolved to ids.
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub genre_ids: Vec<i64>,
}

/// Partial update for a title.
///
/// `category_id: Some(None)` detaches the category; `genre_ids: Some(..)`
/// replaces the whole genre set.
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<i64>>,
    pub genre_ids: Option<Vec<i64>>,
}

/// Filters accepted by the title listing.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
}
