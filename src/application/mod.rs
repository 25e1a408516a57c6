//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and permission rules, and
//! give HTTP handlers a narrow API. They depend only on domain traits.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Signup, token issuance, bearer checks
//! - [`services::user_service::UserService`] - Account administration and profiles
//! - [`services::category_service::CategoryService`] - Categories
//! - [`services::genre_service::GenreService`] - Genres
//! - [`services::title_service::TitleService`] - Titles and reference resolution
//! - [`services::review_service::ReviewService`] - Reviews
//! - [`services::comment_service::CommentService`] - Comments

pub mod services;
