//! Bearer token authentication extractors.
//!
//! Handlers opt into authentication by taking [`CurrentUser`] or
//! [`AdminUser`] as an argument. Public handlers take neither.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts};
use axum_auth::AuthBearer;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::domain::auth::RequestContext;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// The account behind a valid `Authorization: Bearer <jwt>` header.
///
/// # Errors
///
/// Rejects with `401 Unauthorized` (and `WWW-Authenticate: Bearer`) if the
/// header is missing or malformed, the token is invalid or expired, or the
/// account no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Authorization header is missing or invalid"}),
                )
            })?;

        let user = state.auth_service.authenticate(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// A [`CurrentUser`] with the admin role.
///
/// # Errors
///
/// Rejects with `403 Forbidden` for authenticated non-admins.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::warn!(user_id = user.id, path = %parts.uri.path(), "Admin access denied");
            return Err(AppError::forbidden(
                "You do not have permission to perform this action",
                json!({}),
            ));
        }

        Ok(AdminUser(user))
    }
}

/// Client address and user agent of the current request.
///
/// The address is the socket peer, or the first `X-Forwarded-For` hop when the
/// service is configured to run behind a proxy.
#[derive(Debug, Clone)]
pub struct ClientContext(pub RequestContext);

impl FromRequestParts<AppState> for ClientContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let forwarded = state
            .behind_proxy
            .then(|| parts.headers.get("x-forwarded-for"))
            .flatten()
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let client_addr = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ClientContext(RequestContext {
            client_addr,
            user_agent,
        }))
    }
}
