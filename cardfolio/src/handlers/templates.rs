//! Template listing

use axum::{extract::State, Json};

use crate::models::CardTemplate;
use crate::state::AppState;

/// `GET /templates`: the seeded, system-owned template list.
pub async fn list(State(state): State<AppState>) -> Json<Vec<CardTemplate>> {
    Json(state.store().templates())
}
