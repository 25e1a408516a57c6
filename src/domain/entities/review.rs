//! Review entity.

use chrono::{DateTime, Utc};

/// A user's scored review of a title.
///
/// A user can review a given title at most once.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub title_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

/// Input data for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: i64,
    pub author_id: i64,
    pub text: String,
    pub score: i32,
}

/// Partial update for a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub text: Option<String>,
    pub score: Option<i32>,
}
