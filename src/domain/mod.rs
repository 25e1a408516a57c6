//! Domain layer containing business entities and capability contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core catalog data structures
//! - [`repositories`] - Data access trait definitions
//! - [`auth`] - Authentication capabilities (user lookup, token issuing, key delivery)
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Business rules live in services (see [`crate::application::services`])

pub mod auth;
pub mod entities;
pub mod repositories;
