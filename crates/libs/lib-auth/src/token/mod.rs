//! # JWT Token Management
//!
//! JWT generation and validation, plus [`TokenService`], which owns the signing secret and
//! token lifetime and acts as the identity verifier for authenticated requests.

use crate::error::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure containing the authenticated user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Encode a JWT token for `user_id`, valid for `ttl`.
pub fn encode_jwt(user_id: i64, secret: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let exp = now + ttl;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::TokenEncode(e.to_string()))
}

/// Decode and validate a JWT token (signature and expiration).
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| Error::TokenInvalid(e.to_string()))?;

    Ok(token_data.claims)
}

// region: --- TokenService

/// Issues and verifies access tokens with an injected secret.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Build a service whose tokens live for `hours`.
    pub fn with_hours(secret: impl Into<String>, hours: i64) -> Self {
        Self::new(secret, Duration::hours(hours))
    }

    /// Issue a signed access token for `user_id`.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        encode_jwt(user_id, &self.secret, self.ttl)
    }

    /// Verify a bearer token and return the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64> {
        let claims = decode_jwt(token, &self.secret)?;
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| Error::TokenSubject(claims.sub))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}

// endregion: --- TokenService
