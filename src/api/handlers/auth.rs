//! Handlers for signup and token exchange.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use validator::Validate;

use crate::api::dto::auth::{SignupRequest, SignupResponse, TokenError, TokenResponse};
use crate::api::middleware::auth::ClientContext;
use crate::application::services::TokenOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account, or re-sends a key to an existing one.
///
/// # Endpoint
///
/// `POST /api/v1/auth/signup`
///
/// A fresh confirmation key is generated on every call and delivered out of
/// band; the response only echoes the account.
///
/// # Errors
///
/// Returns 400 if the payload is invalid, or if the username or email belongs
/// to a different account.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .signup(&payload.username, &payload.email)
        .await?;

    Ok(Json(user.into()))
}

/// Exchanges an identifier and confirmation key for an access token.
///
/// # Endpoint
///
/// `POST /api/v1/auth/token`
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "confirmation_key": "K7QX2M9PRT4A" }
/// ```
///
/// The identifier key is `email` or `username` depending on configuration.
///
/// # Response
///
/// - **200 OK**: `{"token": "<jwt>"}`
/// - **400 Bad Request**: `{"error": "confirmation_code is not valid"}` for an
///   unknown account or a wrong key; the standard validation error body if a
///   field is missing
pub async fn token_handler(
    State(state): State<AppState>,
    ClientContext(context): ClientContext,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Response, AppError> {
    let request = state.auth_service.parse_token_request(&payload)?;

    let response = match state.auth_service.obtain_token(&request, &context).await? {
        TokenOutcome::Issued(token) => Json(TokenResponse {
            token: token.into_string(),
        })
        .into_response(),
        TokenOutcome::Rejected(message) => (
            StatusCode::BAD_REQUEST,
            Json(TokenError {
                error: message.to_string(),
            }),
        )
            .into_response(),
    };

    Ok(response)
}
