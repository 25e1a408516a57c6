//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts, roles and confirmation keys
//! - [`CategoryRepository`] / [`GenreRepository`] - Slug-unique tags
//! - [`TitleRepository`] - Catalog items with expanded relations
//! - [`ReviewRepository`] - Scored reviews
//! - [`CommentRepository`] - Comments on reviews
//! - [`HealthCheck`] - Storage liveness probe

pub mod category_repository;
pub mod comment_repository;
pub mod genre_repository;
pub mod health_check;
pub mod review_repository;
pub mod title_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use comment_repository::CommentRepository;
pub use genre_repository::GenreRepository;
pub use health_check::HealthCheck;
pub use review_repository::ReviewRepository;
pub use title_repository::TitleRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
#[cfg(test)]
pub use genre_repository::MockGenreRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use title_repository::MockTitleRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
