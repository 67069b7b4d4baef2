//! Public card page and unauthenticated engagement intake
//!
//! Everything here is reachable without a token: visitors fetch the card,
//! view the rendered page, leave messages, request appointments, and have
//! their link clicks tracked. Visitor IPs are hashed before storage.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::extractors::{ClientIp, JsonBody};
use crate::handlers::Ack;
use crate::models::{AppointmentRecord, Card, LinkClickRecord, MessageRecord, VisitRecord};
use crate::state::AppState;

/// Visitor message payload. Only the content is required.
#[derive(Debug, Deserialize)]
pub struct MessagePayload {
    /// Sender's name, if given.
    pub sender_name: Option<String>,
    /// Sender's email, if given.
    pub sender_email: Option<String>,
    /// Message body.
    pub message_content: Option<String>,
}

/// Appointment request payload; all fields required.
#[derive(Debug, Deserialize)]
pub struct AppointmentPayload {
    /// Requester's name.
    pub requester_name: Option<String>,
    /// Requester's email.
    pub requester_email: Option<String>,
    /// Free-form proposed time.
    pub proposed_time: Option<String>,
}

/// Link click payload; both fields required.
#[derive(Debug, Deserialize)]
pub struct LinkClickPayload {
    /// Which link was clicked.
    pub link_type: Option<String>,
    /// The clicked URL.
    pub link_url: Option<String>,
}

/// `GET /cards/public/{slug}`: active card data for the public page.
pub async fn card_by_slug(
    State(state): State<AppState>,
    Path(card_slug): Path<String>,
) -> Result<Json<Card>, ApiError> {
    Ok(Json(lookup_active(&state, &card_slug)?))
}

/// `GET /cards/public/{slug}/page`: the server-rendered card page.
///
/// Runs the card through its template via the renderer and also counts the
/// request as a visit, mirroring what the card fetch plus view beacon do
/// for API clients.
pub async fn card_page(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(card_slug): Path<String>,
) -> Result<Html<String>, ApiError> {
    let card = lookup_active(&state, &card_slug)?;
    let template = state
        .store()
        .template_by_id(card.template_id)
        .ok_or_else(|| ApiError::NotFound("Card template could not be loaded".to_string()))?;

    record_visit_for(&state, &card, &ip);

    let body = card.render_with(&template.structure_definition);
    let css = card
        .custom_css
        .as_deref()
        .map(|css| format!("<style>{css}</style>"))
        .unwrap_or_default();
    Ok(Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n{css}</head>\n<body>\n{body}\n</body>\n</html>\n",
        card.full_name,
    )))
}

/// `POST /cards/{slug}/view`: visit beacon from the public page.
pub async fn record_view(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(card_slug): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    let card = lookup_active(&state, &card_slug)?;
    record_visit_for(&state, &card, &ip);
    Ok(Json(Ack::new("View recorded")))
}

/// `POST /cards/{slug}/message`
pub async fn record_message(
    State(state): State<AppState>,
    Path(card_slug): Path<String>,
    JsonBody(payload): JsonBody<MessagePayload>,
) -> Result<Json<Ack>, ApiError> {
    let card = lookup_active(&state, &card_slug)?;
    let content = payload
        .message_content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("Missing message_content in request body".to_string())
        })?;

    state.store().record_message(MessageRecord {
        card_id: card.id,
        sender_name: payload.sender_name,
        sender_email: payload.sender_email,
        message_content: content,
        received_at: Utc::now(),
    });
    Ok(Json(Ack::new("Message recorded")))
}

/// `POST /cards/{slug}/book-appointment`
pub async fn record_appointment(
    State(state): State<AppState>,
    Path(card_slug): Path<String>,
    JsonBody(payload): JsonBody<AppointmentPayload>,
) -> Result<Json<Ack>, ApiError> {
    let card = lookup_active(&state, &card_slug)?;
    let (Some(requester_name), Some(requester_email), Some(proposed_time)) = (
        payload.requester_name.filter(|s| !s.is_empty()),
        payload.requester_email.filter(|s| !s.is_empty()),
        payload.proposed_time.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing requester_name, requester_email, or proposed_time in request body"
                .to_string(),
        ));
    };

    state.store().record_appointment(AppointmentRecord {
        card_id: card.id,
        requester_name,
        requester_email,
        proposed_time,
        created_at: Utc::now(),
    });
    Ok(Json(Ack::new("Appointment request recorded")))
}

/// `POST /cards/{slug}/click-link`
pub async fn record_link_click(
    State(state): State<AppState>,
    Path(card_slug): Path<String>,
    JsonBody(payload): JsonBody<LinkClickPayload>,
) -> Result<Json<Ack>, ApiError> {
    let card = lookup_active(&state, &card_slug)?;
    let (Some(link_type), Some(link_url)) = (
        payload.link_type.filter(|s| !s.is_empty()),
        payload.link_url.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing link_type or link_url in request body".to_string(),
        ));
    };

    state.store().record_link_click(LinkClickRecord {
        card_id: card.id,
        link_type,
        link_url,
        clicked_at: Utc::now(),
    });
    Ok(Json(Ack::new("Link click recorded")))
}

fn lookup_active(state: &AppState, card_slug: &str) -> Result<Card, ApiError> {
    state
        .store()
        .active_card_by_slug(card_slug)
        .ok_or_else(|| ApiError::NotFound("Card not found or not active".to_string()))
}

fn record_visit_for(state: &AppState, card: &Card, ip: &str) {
    let now = Utc::now();
    state.store().record_visit(VisitRecord {
        card_id: card.id,
        visit_date: now.date_naive(),
        visitor_ip_hash: hex::encode(Sha256::digest(ip.as_bytes())),
        timestamp: now,
    });
}
