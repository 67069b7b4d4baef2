//! Service error type and HTTP mapping
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl
//! turns the error into the status code and `{"message": "..."}` body the
//! API contract promises.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Service error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("{0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Conflict (409)
    #[error("{0}")]
    Conflict(String),

    /// Internal server error (500); detail is logged, not returned
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref source) = self {
            tracing::error!(error = %source, "internal error");
        }
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail
            | StoreError::DuplicateUsername
            | StoreError::DuplicateSlug => Self::Conflict(err.to_string()),
            StoreError::UnknownTemplate => Self::BadRequest(err.to_string()),
            StoreError::CardNotFound => Self::NotFound(err.to_string()),
            StoreError::NotOwner => Self::Forbidden(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::BadRequest(format!("Validation failed: {errors}"))
    }
}
