//! HTTP handlers and router assembly
//!
//! Thin request/response plumbing over the store and the renderer. Paths
//! under `/cards` carry either a numeric card id (owner-only routes) or a
//! public slug (unauthenticated intake routes); the variable segment
//! directly under `/cards` is named `card_ref` uniformly so the route tree
//! stays consistent, while routes under the static `public` segment bind
//! the slug by name.

pub mod analytics;
pub mod auth;
pub mod cards;
pub mod public;
pub mod templates;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the service router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/protected", get(auth::protected))
        .route("/templates", get(templates::list))
        .route("/cards", post(cards::create).get(cards::list))
        .route(
            "/cards/{card_ref}",
            get(cards::fetch).put(cards::update).delete(cards::delete),
        )
        .route("/cards/public/{card_slug}", get(public::card_by_slug))
        .route("/cards/public/{card_slug}/page", get(public::card_page))
        .route("/cards/{card_ref}/view", post(public::record_view))
        .route("/cards/{card_ref}/message", post(public::record_message))
        .route(
            "/cards/{card_ref}/book-appointment",
            post(public::record_appointment),
        )
        .route("/cards/{card_ref}/click-link", post(public::record_link_click))
        .route("/cards/{card_ref}/analytics/visitors", get(analytics::visitors))
        .route("/cards/{card_ref}/analytics/messages", get(analytics::messages))
        .route(
            "/cards/{card_ref}/analytics/appointments",
            get(analytics::appointments),
        )
        .route(
            "/cards/{card_ref}/analytics/link_clicks",
            get(analytics::link_clicks),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Simple `{"message": ...}` acknowledgement body.
#[derive(Debug, serde::Serialize)]
pub struct Ack {
    /// Human-readable outcome.
    pub message: String,
}

impl Ack {
    /// Build an acknowledgement from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
