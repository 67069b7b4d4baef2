//! Authentication extractor for axum handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use cardfolio::auth::CurrentUser;
//! use axum::response::IntoResponse;
//!
//! async fn protected_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// Authenticated account extractor for protected routes.
///
/// Parses the `Authorization: Bearer <token>` header, verifies the token,
/// and loads the account it names. Rejection is a 401 with the reason in
/// the JSON message body; a token naming a deleted account is treated the
/// same as an invalid token.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.token_keys().verify(token)?;

        let user = app_state
            .store()
            .user_by_id(claims.identity)
            .ok_or(AuthError::InvalidToken)?;

        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::TokenExpired | AuthError::InvalidToken => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::Hashing | AuthError::Signing => Self::Internal(err.into()),
        }
    }
}
