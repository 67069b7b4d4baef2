//! Application state
//!
//! One cloneable handle carrying the configuration, the in-memory store,
//! and the token keys. Handlers receive it through axum's `State`.

use std::sync::Arc;

use crate::{auth::TokenKeys, config::AppConfig, store::MemoryStore};

/// Shared application state.
///
/// Cheap to clone; all members are behind `Arc`s or are key material.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    store: Arc<MemoryStore>,
    token_keys: TokenKeys,
}

impl AppState {
    /// Build state from configuration with a fresh, template-seeded store.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let token_keys = TokenKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
        Self {
            config: Arc::new(config),
            store: Arc::new(MemoryStore::new()),
            token_keys,
        }
    }

    /// Configuration reference.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Store reference.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Token signing/verification keys.
    #[must_use]
    pub const fn token_keys(&self) -> &TokenKeys {
        &self.token_keys
    }
}
