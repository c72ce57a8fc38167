use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

/// Claims carried by an access token.
///
/// `info` is whatever the client asked to have signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub info: Map<String, Value>,
}

/// Signs and verifies HS256 access tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    /// Token lifetime, also used as the cookie max-age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs `info` into a token that expires after the configured lifetime.
    pub fn issue(&self, info: Map<String, Value>) -> Result<String, AuthError> {
        self.issue_at(info, Utc::now().timestamp())
    }

    fn issue_at(&self, mut info: Map<String, Value>, issued_at: i64) -> Result<String, AuthError> {
        // Timing claims are always ours.
        info.remove("iat");
        info.remove("exp");

        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
            info,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Checks the signature and expiry of a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
