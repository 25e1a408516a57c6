//! HTTP middleware and extractors for request processing and protection.
//!
//! Provides authentication extractors, rate limiting, and request tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
