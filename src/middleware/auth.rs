// ABOUTME: Bearer-token authentication middleware for route handlers
// ABOUTME: Validates JWTs from the Authorization header and yields the user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::auth::{AuthManager, AuthResult, JwtValidationError};
use crate::errors::{AppError, AppResult};
use axum::http::HeaderMap;
use uuid::Uuid;

/// Authentication middleware shared by all protected routes
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
}

impl AuthMiddleware {
    /// Create new auth middleware around a token manager
    #[must_use]
    pub const fn new(auth_manager: AuthManager) -> Self {
        Self { auth_manager }
    }

    /// Authenticate a request from its headers
    ///
    /// Expects `Authorization: Bearer <jwt>`. Expired, invalid, and
    /// malformed tokens each produce their own error so clients can tell
    /// a stale session from a broken one.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the header is missing, `AuthMalformed`
    /// when it is not a bearer token, and the matching auth error for a
    /// token that fails validation
    pub fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_malformed("Authorization header must be a bearer token"))?;

        let claims = self
            .auth_manager
            .validate_token_detailed(token)
            .map_err(|e| match e {
                JwtValidationError::TokenExpired { .. } => AppError::auth_expired(),
                JwtValidationError::TokenInvalid { reason } => AppError::auth_invalid(reason),
                JwtValidationError::TokenMalformed { details } => AppError::auth_malformed(details),
            })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|e| AppError::auth_invalid(format!("Token subject is not a user id: {e}")))?;

        tracing::debug!(user_id = %user_id, "Request authenticated");
        Ok(AuthResult { user_id })
    }
}
