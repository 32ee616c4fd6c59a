// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 DevHub Contributors

//! Access token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the user id as the `sub` claim.
//! Verification trusts the embedded id as-is; no account lookup happens
//! here.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (user ID)
    sub: String,
    /// Issued at timestamp
    iat: i64,
    /// Expiration timestamp
    exp: i64,
}

/// Issues and verifies access tokens with a shared HMAC secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service. `ttl_secs` is the fixed validity window
    /// applied to every issued token.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a signed token for a user id.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Verify a token and return the embedded user id.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_to_subject() {
        let tokens = TokenService::new("test-secret", 3600);
        let token = tokens.issue("user_123").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "user_123");
    }

    #[test]
    fn expired_token_is_rejected() {
        // TTL far enough in the past to clear the leeway window.
        let tokens = TokenService::new("test-secret", -3600);
        let token = tokens.issue("user_123").unwrap();
        assert!(matches!(
            tokens.verify(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let ours = TokenService::new("test-secret", 3600);
        let theirs = TokenService::new("other-secret", 3600);
        let token = theirs.issue("user_123").unwrap();
        assert!(matches!(
            ours.verify(&token).unwrap_err(),
            AuthError::InvalidSignature
        ));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let tokens = TokenService::new("test-secret", 3600);
        assert!(matches!(
            tokens.verify("not-a-jwt").unwrap_err(),
            AuthError::MalformedToken
        ));
    }
}
