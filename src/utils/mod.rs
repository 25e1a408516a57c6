//! Credential helpers shared by the auth service and the admin CLI.
//!
//! - [`confirmation_key`] - Key generation and constant-time comparison
//! - [`password`] - Argon2id password hashing

pub mod confirmation_key;
pub mod password;
