//! DTOs for review endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Review, ReviewChanges};

/// A review as returned to clients. `title` and `author` are derived from the
/// URL and the caller, and ignored on input.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub title: i64,
    pub text: String,
    pub author: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            title: review.title_id,
            text: review.text,
            author: review.author_username,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1))]
    pub text: String,

    #[validate(range(min = 1, max = 10))]
    pub score: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1))]
    pub text: Option<String>,

    #[validate(range(min = 1, max = 10))]
    pub score: Option<i32>,
}

impl From<UpdateReviewRequest> for ReviewChanges {
    fn from(req: UpdateReviewRequest) -> Self {
        Self {
            text: req.text,
            score: req.score,
        }
    }
}
