//! Registration, login, and the token smoke-test endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{self, CurrentUser};
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::handlers::Ack;
use crate::state::AppState;

/// Registration payload. Fields are optional so presence failures produce
/// the API's own message instead of a deserialization rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    /// Desired unique username.
    pub username: Option<String>,
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Plaintext password, hashed before storage.
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Successful login body.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
}

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> Result<(StatusCode, Json<Ack>), ApiError> {
    let (Some(username), Some(email), Some(password)) = (
        payload.username.as_deref().filter(|s| !s.is_empty()),
        payload.email.as_deref().filter(|s| !s.is_empty()),
        payload.password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing username, email, or password".to_string(),
        ));
    };
    payload.validate()?;

    let password_hash = auth::hash_password(password)?;
    let user = state.store().create_user(username, email, password_hash)?;
    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(Ack::new("User registered successfully")),
    ))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (Some(email), Some(password)) = (
        payload.email.as_deref().filter(|s| !s.is_empty()),
        payload.password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Missing email or password".to_string()));
    };

    let user = state
        .store()
        .user_by_email(email)
        .filter(|user| auth::verify_password(password, &user.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let token = state.token_keys().issue(user.id, &user.username)?;
    tracing::debug!(user_id = user.id, "token issued");

    Ok(Json(TokenResponse { token }))
}

/// `GET /protected`: exercises the full token path; kept as a smoke test
/// for API clients.
pub async fn protected(CurrentUser(user): CurrentUser) -> Json<Ack> {
    Json(Ack::new(format!(
        "Hello {}! User ID: {}. This is a protected resource.",
        user.username, user.id
    )))
}
