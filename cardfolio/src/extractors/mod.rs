//! Request extractors
//!
//! [`ClientIp`] feeds visit analytics (the raw address is hashed before
//! storage; see the public handlers). [`JsonBody`] replaces the framework's
//! plain-text body rejection with the API's JSON error contract.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body.
///
/// Extraction behaves like `axum::Json` but a missing, non-JSON, or
/// malformed body is reported as a 400 with the API's `{"message"}` shape
/// instead of the framework's plain-text rejection.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest("Request body must be JSON".to_string()))?;
        Ok(Self(value))
    }
}

/// Best-effort client IP address.
///
/// Prefers the first entry of `x-forwarded-for` (the service is expected to
/// sit behind a reverse proxy in production), then the socket peer address,
/// then `"unknown"`. Extraction never fails, so analytics intake cannot be
/// broken by a missing proxy header.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(client_ip(parts)))
    }
}

fn client_ip(parts: &Parts) -> String {
    if let Some(forwarded) = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_owned();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_owned(), |info| info.0.ip().to_string())
}
