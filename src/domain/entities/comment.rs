//! Comment entity.

use chrono::{DateTime, Utc};

/// A comment left on a review.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

/// Input data for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: i64,
    pub author_id: i64,
    pub text: String,
}
