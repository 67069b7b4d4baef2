//! cardfolio: digital business card service
//!
//! A registered user builds a business card from a shared template,
//! publishes it at a slug-based public URL, and reviews engagement
//! analytics (visitors, messages, appointment requests, link clicks)
//! collected from that public page.
//!
//! The heart of the crate is the [`render`] module: a pure, single-pass
//! substitution of `{{name}}` placeholder tokens against a card's flat
//! data record plus its `social_media_links` group. Everything else is
//! request/response plumbing around it:
//!
//! - [`store`]: process-local persistence seeded with the built-in
//!   templates
//! - [`auth`]: Argon2 password hashing and HS256 bearer tokens
//! - [`handlers`]: the REST surface (auth, templates, card CRUD, public
//!   page, analytics)
//! - [`config`] / [`observability`]: figment-based configuration and
//!   tracing setup
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cardfolio::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     cardfolio::observability::init()?;
//!
//!     let config = AppConfig::load()?;
//!     let addr = format!("{}:{}", config.server.host, config.server.port);
//!     let state = AppState::new(config);
//!
//!     let listener = tokio::net::TcpListener::bind(&addr).await?;
//!     axum::serve(
//!         listener,
//!         router(state).into_make_service_with_connect_info::<std::net::SocketAddr>(),
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod render;
pub mod state;
pub mod store;

pub mod prelude {
    //! Convenience re-exports for common types
    //!
    //! # Examples
    //!
    //! ```rust
    //! use cardfolio::prelude::*;
    //! ```

    // Core rendering
    pub use crate::render::render;

    // Domain records
    pub use crate::models::{Card, CardTemplate, User};

    // Persistence
    pub use crate::store::{CardUpdate, MemoryStore, NewCard, StoreError};

    // Authentication
    pub use crate::auth::{CurrentUser, TokenKeys};

    // Error type
    pub use crate::error::ApiError;

    // Application state and router
    pub use crate::handlers::router;
    pub use crate::state::AppState;

    // Configuration
    pub use crate::config::AppConfig;

    // Re-export key dependencies
    pub use axum;
    pub use serde_json::json;
}
