//! Production implementations of the authentication capabilities.
//!
//! - [`JwtTokenIssuer`] - HS256 access tokens
//! - [`RepositoryUserLookup`] - Account resolution through [`crate::domain::repositories::UserRepository`]
//! - [`LogConfirmationSender`] - Key delivery via the log

pub mod jwt;
pub mod log_sender;
pub mod user_lookup;

pub use jwt::{DEFAULT_ACCESS_TTL_MINUTES, JwtConfig, JwtTokenIssuer, MAX_ACCESS_TTL_MINUTES};
pub use log_sender::LogConfirmationSender;
pub use user_lookup::RepositoryUserLookup;
