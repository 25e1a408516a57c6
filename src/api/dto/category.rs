//! DTOs for category endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Category;

/// Letters, digits, `-` and `_`. Blank slugs are rejected by the service.
pub(crate) static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]*$").expect("valid slug regex"));

/// Wire form of a category, used both as input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryDto {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 50))]
    #[validate(regex(path = "*SLUG_REGEX", message = "Enter a valid slug."))]
    pub slug: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
        }
    }
}

/// Query for the category and genre lists.
#[derive(Debug, Deserialize)]
pub struct TagListQuery {
    /// Substring of the name.
    pub search: Option<String>,

    #[serde(flatten)]
    pub pagination: super::pagination::PaginationParams,
}
