//! Card CRUD for the owning account

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::handlers::Ack;
use crate::models::{Card, CardFields};
use crate::state::AppState;
use crate::store::{CardUpdate, NewCard};

/// Slugs become public URL path segments, so the charset is restricted up
/// front.
static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap_or_else(|e| unreachable!("invalid slug pattern: {e}"))
});

/// Card creation payload. `template_id`, `card_slug`, and `full_name` are
/// required; everything else is optional content.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardPayload {
    /// Template to render with.
    pub template_id: Option<i64>,
    /// Desired public slug.
    #[validate(regex(
        path = *SLUG_PATTERN,
        message = "card_slug may only contain letters, numbers, hyphens, and underscores"
    ))]
    pub card_slug: Option<String>,
    /// Card holder's name.
    pub full_name: Option<String>,
    /// Optional content fields.
    #[serde(flatten)]
    pub fields: CardFields,
}

/// Card update payload; every field is optional and absent fields keep
/// their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCardPayload {
    /// New template id.
    pub template_id: Option<i64>,
    /// New slug.
    #[validate(regex(
        path = *SLUG_PATTERN,
        message = "card_slug may only contain letters, numbers, hyphens, and underscores"
    ))]
    pub card_slug: Option<String>,
    /// New holder name.
    pub full_name: Option<String>,
    /// Optional content changes.
    #[serde(flatten)]
    pub fields: CardFields,
}

/// `POST /cards`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<CreateCardPayload>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    payload.validate()?;
    let template_id = payload
        .template_id
        .ok_or_else(|| missing_field("template_id"))?;
    let card_slug = payload
        .card_slug
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing_field("card_slug"))?;
    let full_name = payload
        .full_name
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing_field("full_name"))?;

    let card = state.store().create_card(
        user.id,
        NewCard {
            template_id,
            card_slug,
            full_name,
            fields: payload.fields,
        },
    )?;
    tracing::info!(card_id = card.id, user_id = user.id, "card created");

    Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /cards`: all cards owned by the caller.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<Card>> {
    Json(state.store().cards_for_user(user.id))
}

/// `GET /cards/{id}`: one owned card.
pub async fn fetch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
) -> Result<Json<Card>, ApiError> {
    Ok(Json(state.store().owned_card(card_id, user.id)?))
}

/// `PUT /cards/{id}`: partial update of an owned card.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateCardPayload>,
) -> Result<Json<Card>, ApiError> {
    payload.validate()?;
    let card = state.store().update_card(
        card_id,
        user.id,
        CardUpdate {
            template_id: payload.template_id,
            card_slug: payload.card_slug,
            full_name: payload.full_name,
            fields: payload.fields,
        },
    )?;
    tracing::info!(card_id, user_id = user.id, "card updated");
    Ok(Json(card))
}

/// `DELETE /cards/{id}`
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    state.store().delete_card(card_id, user.id)?;
    tracing::info!(card_id, user_id = user.id, "card deleted");
    Ok(Json(Ack::new("Card deleted successfully")))
}

fn missing_field(field: &str) -> ApiError {
    ApiError::BadRequest(format!("Missing required field: {field}"))
}
