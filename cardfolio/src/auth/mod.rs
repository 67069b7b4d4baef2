//! Bearer-token authentication
//!
//! Login issues an HS256 JWT whose claims carry the account id (as
//! `identity`) and username; the token is the sole authorization artifact
//! and is attached to requests as `Authorization: Bearer <token>`.
//! Passwords are hashed with Argon2.

mod extractors;

pub use extractors::CurrentUser;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header on the request.
    #[error("Authentication required")]
    MissingToken,

    /// The token's expiry has passed.
    #[error("Token has expired")]
    TokenExpired,

    /// The token failed signature or claims validation.
    #[error("Invalid token")]
    InvalidToken,

    /// Password hashing failed; never carries the password itself.
    #[error("Password hashing failed")]
    Hashing,

    /// Token signing failed.
    #[error("Token signing failed")]
    Signing,
}

/// JWT claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id of the bearer.
    pub identity: i64,
    /// Username snapshot at issue time.
    pub username: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signing and verification keys plus token lifetime.
///
/// Built once from configuration and shared through application state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// Derive keys from the shared HS256 secret.
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for an account.
    ///
    /// # Errors
    ///
    /// Fails only if JWT encoding itself fails.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        let claims = Claims {
            identity: user_id,
            username: username.to_owned(),
            exp: Utc::now().timestamp() + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// [`AuthError::TokenExpired`] for an expired token, otherwise
    /// [`AuthError::InvalidToken`] for any validation failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Hash a password with Argon2 and a fresh random salt.
///
/// # Errors
///
/// Fails only if the hasher itself fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Check a password against a stored hash.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
