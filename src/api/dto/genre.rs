//! DTOs for genre endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::category::SLUG_REGEX;
use crate::domain::entities::Genre;

/// Wire form of a genre, used both as input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenreDto {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 50))]
    #[validate(regex(path = "*SLUG_REGEX", message = "Enter a valid slug."))]
    pub slug: String,
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            name: genre.name,
            slug: genre.slug,
        }
    }
}
