//! Configuration management
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `CARDFOLIO_` prefix,
//!    `__` as section separator, e.g. `CARDFOLIO_SERVER__PORT=8080`)
//! 2. `./cardfolio.toml`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # cardfolio.toml
//! [server]
//! host = "0.0.0.0"
//! port = 5001
//!
//! [auth]
//! jwt_secret = "change-me-in-production"
//! token_ttl_secs = 3600
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

/// Token issuing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing secret. The default is for development only.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "cardfolio-dev-secret".to_string(),
            token_ttl_secs: 3600,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Token issuing settings
    #[serde(default)]
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Load configuration from defaults, `./cardfolio.toml`, and the
    /// environment, in increasing precedence.
    ///
    /// # Errors
    ///
    /// Fails when a source is present but malformed.
    pub fn load() -> anyhow::Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("cardfolio.toml"))
            .merge(Env::prefixed("CARDFOLIO_").split("__"))
            .extract()
            .map_err(Into::into)
    }
}
