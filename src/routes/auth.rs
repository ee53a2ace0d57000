// ABOUTME: Route handlers for user registration and login
// ABOUTME: Issues JWT session tokens after bcrypt credential verification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::{
    constants::{
        error_messages,
        limits::{MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH},
    },
    errors::AppError,
    models::User,
    server::ServerResources,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// Email format check, anchored
/// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Request to register a new account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name, 3-30 characters
    pub username: String,
    /// Email address
    pub email: String,
    /// Password, at least 6 characters
    pub password: String,
}

/// Response for a successful registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// New user's id
    pub user_id: String,
    /// Display name
    pub username: String,
    /// Lowercased email
    pub email: String,
    /// Session token
    pub token: String,
}

/// Request to log in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token
    pub token: String,
    /// Token expiry timestamp
    pub expires_at: String,
    /// The authenticated user's profile
    pub user: User,
}

/// Registration and login routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Build the auth router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/register", post(Self::handle_register))
            .route("/api/users/login", post(Self::handle_login))
            .with_state(resources)
    }

    pub(crate) fn is_valid_email(email: &str) -> bool {
        EMAIL_PATTERN
            .as_ref()
            .is_some_and(|re| re.is_match(email))
    }

    /// Username bounds are counted in characters, not bytes
    pub(crate) fn validate_username(username: &str) -> Result<(), AppError> {
        let length = username.chars().count();
        if length < MIN_USERNAME_LENGTH || length > MAX_USERNAME_LENGTH {
            return Err(AppError::invalid_input(
                "Username must be between 3 and 30 characters",
            ));
        }
        Ok(())
    }

    /// Handle POST /api/users/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        tracing::info!("User registration attempt for email: {}", request.email);

        let username = request.username.trim();
        Self::validate_username(username)?;
        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        let password = request.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

        let user = User::new(username.to_string(), request.email, password_hash);
        resources.database.users().create(&user).await?;

        let token = resources.auth_manager.generate_token(&user)?;

        tracing::info!("User registered successfully: {} ({})", user.email, user.id);

        let response = RegisterResponse {
            user_id: user.id.to_string(),
            username: user.username,
            email: user.email,
            token,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/users/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        tracing::info!("User login attempt for email: {}", request.email);

        // Unknown email and wrong password produce the same 401 so the
        // endpoint cannot be used to enumerate accounts
        let user = resources
            .database
            .users()
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        // Verify password using spawn_blocking to avoid blocking the async executor
        let password = request.password;
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        resources.database.users().update_last_login(user.id).await?;

        let token = resources.auth_manager.generate_token(&user)?;
        let expires_at = chrono::Utc::now()
            + chrono::Duration::hours(crate::constants::limits::SESSION_EXPIRY_HOURS);

        tracing::info!("User logged in successfully: {} ({})", user.email, user.id);

        let response = LoginResponse {
            token,
            expires_at: expires_at.to_rfc3339(),
            user,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
