//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check with database ping (public)
//! - `/api/v1/auth/*`    - Signup and token exchange (public, rate limited)
//! - `/api/v1/*`         - Catalog, reviews and accounts
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the auth endpoints
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Prefix of the versioned REST API.
pub const API_PREFIX: &str = "/api/v1";

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
///
/// When `state.behind_proxy` is set, rate limiting reads the client IP from
/// `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address.
/// Enable it only when the service runs behind a trusted reverse proxy.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let auth_routes = if state.behind_proxy {
        api::routes::auth_routes().layer(rate_limit::proxied_layer())
    } else {
        api::routes::auth_routes().layer(rate_limit::layer())
    };

    let api_router = Router::new()
        .merge(auth_routes)
        .merge(api::routes::resource_routes());

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
