//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`auth`] - Token signing, account lookup and key delivery
//! - [`persistence`] - PostgreSQL repository implementations

pub mod auth;
pub mod persistence;
