//! Owner-only engagement analytics
//!
//! Four independent lists per card. Every handler verifies ownership of
//! the card before touching the analytics stores; the aggregation itself
//! (daily unique visitors, newest-first ordering) lives in the store.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::models::{AppointmentRecord, LinkClickRecord, MessageRecord, VisitorStat};
use crate::state::AppState;

/// `GET /cards/{id}/analytics/visitors`: daily unique visitor counts.
pub async fn visitors(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
) -> Result<Json<Vec<VisitorStat>>, ApiError> {
    state.store().owned_card(card_id, user.id)?;
    Ok(Json(state.store().visitor_stats(card_id)))
}

/// `GET /cards/{id}/analytics/messages`: newest first.
pub async fn messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    state.store().owned_card(card_id, user.id)?;
    Ok(Json(state.store().messages_for(card_id)))
}

/// `GET /cards/{id}/analytics/appointments`: newest first.
pub async fn appointments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
) -> Result<Json<Vec<AppointmentRecord>>, ApiError> {
    state.store().owned_card(card_id, user.id)?;
    Ok(Json(state.store().appointments_for(card_id)))
}

/// `GET /cards/{id}/analytics/link_clicks`: newest first.
pub async fn link_clicks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<i64>,
) -> Result<Json<Vec<LinkClickRecord>>, ApiError> {
    state.store().owned_card(card_id, user.id)?;
    Ok(Json(state.store().link_clicks_for(card_id)))
}
