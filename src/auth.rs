// ABOUTME: JWT-based user authentication for the Larder recipe API
// ABOUTME: Handles token generation and validation with detailed expiry errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # Authentication and Session Management
//!
//! JWT-based authentication with HS256 signing. Tokens carry a 30-day expiry,
//! matching the session length of the original application.

use crate::constants::{limits::SESSION_EXPIRY_HOURS, time_constants::SECONDS_PER_HOUR};
use crate::models::User;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / i64::from(SECONDS_PER_HOUR);
    let minutes = (total_secs % i64::from(SECONDS_PER_HOUR)) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let duration_expired = current_time.signed_duration_since(*expired_at);
                write!(
                    f,
                    "JWT token expired {} ago at {}",
                    humanize_duration(duration_expired),
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// Authentication result with user context
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
}

/// Authentication manager for `JWT` tokens and user sessions
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry_hours: i64,
    /// Monotonic counter to ensure unique issued-at times for tokens
    token_counter: AtomicU64,
}

impl Clone for AuthManager {
    fn clone(&self) -> Self {
        Self {
            jwt_secret: self.jwt_secret.clone(),
            token_expiry_hours: self.token_expiry_hours,
            // Fresh counter per instance; each maintains uniqueness independently
            token_counter: AtomicU64::new(0),
        }
    }
}

impl AuthManager {
    /// Create a new authentication manager with the default 30-day expiry
    #[must_use]
    pub const fn new(jwt_secret: Vec<u8>) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours: SESSION_EXPIRY_HOURS,
            token_counter: AtomicU64::new(0),
        }
    }

    /// Create a manager with an explicit expiry, used by tests
    #[must_use]
    pub const fn with_expiry(jwt_secret: Vec<u8>, token_expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
            token_counter: AtomicU64::new(0),
        }
    }

    /// Generate a `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails due to invalid claims
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        // Atomic counter keeps issued-at unique when tokens are minted in the same second
        let counter = self.token_counter.fetch_add(1, Ordering::Relaxed);
        let unique_iat =
            now.timestamp() * 1000 + i64::from(u32::try_from(counter % 1000).unwrap_or(0));

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: unique_iat,
            exp: expiry.timestamp(),
            aud: crate::constants::service_names::LARDER_SERVER.to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )?;

        Ok(token)
    }

    /// Validate a JWT token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an error if the token signature is invalid, the token has
    /// expired, or the token is malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[crate::constants::service_names::LARDER_SERVER]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        )?;

        Ok(token_data.claims)
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Validate a JWT token with detailed error information
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] distinguishing expired, invalid, and
    /// malformed tokens so the middleware can log and report each precisely
    pub fn validate_token_detailed(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let claims = self.decode_token_claims(token)?;
        Self::validate_claims_expiry(&claims)?;
        Ok(claims)
    }

    /// Decode JWT token claims without expiration validation
    fn decode_token_claims(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation_no_exp = Validation::new(Algorithm::HS256);
        validation_no_exp.validate_exp = false;
        validation_no_exp.set_audience(&[crate::constants::service_names::LARDER_SERVER]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation_no_exp,
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Validate claims expiration with detailed logging
    fn validate_claims_expiry(claims: &Claims) -> Result<(), JwtValidationError> {
        let current_time = Utc::now();
        if current_time.timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
            tracing::warn!(
                "JWT token expired for user: {} - Expired {} ago at {}",
                claims.sub,
                humanize_duration(current_time.signed_duration_since(expired_at)),
                expired_at.to_rfc3339()
            );
            return Err(JwtValidationError::TokenExpired {
                expired_at,
                current_time,
            });
        }
        Ok(())
    }

    /// Extract the user `ID` from a validated token
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the subject is not a UUID
    pub fn extract_user_id(&self, token: &str) -> Result<Uuid> {
        let claims = self.validate_token(token)?;
        Uuid::parse_str(&claims.sub).with_context(|| {
            format!("Failed to parse user ID from JWT token subject: {}", claims.sub)
        })
    }
}

/// Generate a random `JWT` secret
///
/// Used when `JWT_SECRET` is not configured in development mode.
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    use rand::RngCore;

    let mut secret = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "alice".into(),
            "alice@example.com".into(),
            "$2b$12$hash".into(),
        )
    }

    #[test]
    fn test_generate_and_validate_token() {
        let manager = AuthManager::new(b"test-secret".to_vec());
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(manager.extract_user_id(&token).unwrap(), user.id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = AuthManager::new(b"secret-a".to_vec());
        let other = AuthManager::new(b"secret-b".to_vec());
        let token = manager.generate_token(&test_user()).unwrap();

        let err = other.validate_token_detailed(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_expired_token_detailed_error() {
        let manager = AuthManager::with_expiry(b"test-secret".to_vec(), -1);
        let token = manager.generate_token(&test_user()).unwrap();

        let err = manager.validate_token_detailed(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
    }

    #[test]
    fn test_malformed_token() {
        let manager = AuthManager::new(b"test-secret".to_vec());
        let err = manager.validate_token_detailed("not-a-jwt").unwrap_err();
        assert!(matches!(
            err,
            JwtValidationError::TokenMalformed { .. } | JwtValidationError::TokenInvalid { .. }
        ));
    }
}
