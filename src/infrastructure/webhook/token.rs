//! # Token Signer
//!
//! Issues the short-lived HS256 tokens that authenticate relay calls to the
//! automation webhook. The claims bind each token to the invoking user and a
//! freshness window; the workflow on the other side verifies them with the
//! same shared secret.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::domain::config::ConfigError;

/// Claim-set version. Bumped if the field layout ever changes, so the
/// verifier can tell old tokens from new ones.
const CLAIMS_VERSION: u8 = 1;

/// Claim set carried by every signed token. The JWT compact form is the
/// wire encoding; the HS256 signature covers every field here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Claim-set version.
    pub v: u8,
    /// Subject: the invoking user's identifier.
    pub sub: String,
    /// Issued-at, as a Unix timestamp.
    pub iat: i64,
    /// Expiry, as a Unix timestamp.
    pub exp: i64,
}

/// A signed, ready-to-send bearer token.
#[derive(Debug, Clone)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Signs relay tokens under the shared secret.
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    /// `ttl_secs` is the freshness window: long enough to survive network
    /// latency to the webhook, short enough to limit replay exposure.
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self { secret: secret.into(), ttl: Duration::seconds(ttl_secs) }
    }

    /// Issue a token for `subject`, valid from `now` until `now + ttl`.
    ///
    /// The clock is a parameter so expiry behavior can be exercised without
    /// waiting out the window.
    pub fn sign(&self, subject: &str, now: DateTime<Utc>) -> Result<SignedToken, ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let claims = Claims {
            v: CLAIMS_VERSION,
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ConfigError::Invalid { var: "JWT_SECRET", reason: e.to_string() })?;

        Ok(SignedToken(token))
    }
}
