//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Queries
//! are checked at runtime against the schema in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts and credentials
//! - [`PgCategoryRepository`] / [`PgGenreRepository`] - Slug-addressed tags
//! - [`PgTitleRepository`] - Titles with category, genres and rating
//! - [`PgReviewRepository`] / [`PgCommentRepository`] - User content
//! - [`PgHealthCheck`] - Connectivity probe

pub mod pg_category_repository;
pub mod pg_comment_repository;
pub mod pg_genre_repository;
pub mod pg_health_check;
pub mod pg_review_repository;
pub mod pg_title_repository;
pub mod pg_user_repository;

pub use pg_category_repository::PgCategoryRepository;
pub use pg_comment_repository::PgCommentRepository;
pub use pg_genre_repository::PgGenreRepository;
pub use pg_health_check::PgHealthCheck;
pub use pg_review_repository::PgReviewRepository;
pub use pg_title_repository::PgTitleRepository;
pub use pg_user_repository::PgUserRepository;
