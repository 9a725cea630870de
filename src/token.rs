//! Session token signing and verification (HS256).
//!
//! Signature and expiry are the stateless half of authentication; the
//! stateful half is the stored-token comparison in `middleware::auth`.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Tokens expire a day after issuance; a fresh login rotates them anyway.
const SESSION_TTL_HOURS: i64 = 24;

/// Precomputed signing material, derived once from the configured secret
/// and shared through the router state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a signed session token for the given identity.
    pub fn sign(&self, id: i64, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}
