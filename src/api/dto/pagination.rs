//! Pagination query parameters and the paged response envelope.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest accepted `page_size`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers, which
/// also keeps them parseable when the struct is flattened into a larger query.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: [`DEFAULT_PAGE_SIZE`]
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is 0 or `page_size` is
    /// outside `1..=MAX_PAGE_SIZE`.
    pub fn offset_limit(&self) -> Result<(i64, i64), AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::field("page", "Page must be greater than 0"));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::field(
                "page_size",
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let offset = (page as i64 - 1) * page_size as i64;
        Ok((offset, page_size as i64))
    }
}

/// Paged list response: the total number of matches and the current page.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Builds a page from a repository `(items, total)` pair, converting each item.
    pub fn from_parts<E>((items, count): (Vec<E>, i64)) -> Self
    where
        T: From<E>,
    {
        Self {
            count,
            results: items.into_iter().map(T::from).collect(),
        }
    }
}
