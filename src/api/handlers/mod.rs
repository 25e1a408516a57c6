//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one resource.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod health;
pub mod reviews;
pub mod titles;
pub mod users;

pub use auth::{signup_handler, token_handler};
pub use categories::{create_category_handler, delete_category_handler, list_categories_handler};
pub use comments::{
    create_comment_handler, delete_comment_handler, get_comment_handler, list_comments_handler,
    update_comment_handler,
};
pub use genres::{create_genre_handler, delete_genre_handler, list_genres_handler};
pub use health::health_handler;
pub use reviews::{
    create_review_handler, delete_review_handler, get_review_handler, list_reviews_handler,
    update_review_handler,
};
pub use titles::{
    create_title_handler, delete_title_handler, get_title_handler, list_titles_handler,
    update_title_handler,
};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler, me_handler,
    update_me_handler, update_user_handler,
};
