//! Core domain entities representing the catalog data model.
//!
//! Entities are plain data structures; behaviour lives in the application
//! services.
//!
//! # Entity Types
//!
//! - [`User`] - An account with a role and a confirmation key
//! - [`Category`] / [`Genre`] - Slug-unique tags referenced by titles
//! - [`Title`] - A catalog item with derived rating
//! - [`Review`] - A scored review of a title
//! - [`Comment`] - A comment on a review
//!
//! # Design Pattern
//!
//! Separate structs are used for creation (`NewUser`, `NewTitle`, ...) and
//! partial updates (`UserChanges`, `TitleChanges`, ...).

pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;

pub use category::{Category, NewCategory};
pub use comment::{Comment, NewComment};
pub use genre::{Genre, NewGenre};
pub use review::{NewReview, Review, ReviewChanges};
pub use title::{NewTitle, Title, TitleChanges, TitleFilter};
pub use user::{NewUser, Role, User, UserChanges};
