// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and router creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `larder`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use larder::{
    ai::RecipeAiClient,
    auth::{generate_jwt_secret, AuthManager},
    config::{AiConfig, Environment, ServerConfig},
    database::Database,
    middleware::AuthMiddleware,
    models::User,
    server::{self, ServerResources},
};
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls verbosity; default WARN keeps test output quiet
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
///
/// A single connection keeps every query on the same in-memory SQLite
/// instance for the lifetime of the pool.
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", 1).await?;
    Ok(database)
}

/// Test authentication manager with a fresh random secret
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(generate_jwt_secret().to_vec())
}

/// Server configuration suitable for tests; no env vars consulted
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        database_url: "sqlite::memory:".into(),
        jwt_secret: "test-secret-not-for-production".into(),
        max_connections: 1,
        cors_origins: vec!["*".into()],
        ai: AiConfig {
            // Unroutable base URL so any accidental AI call fails fast
            base_url: "http://127.0.0.1:1/v1".into(),
            api_key: None,
            model: "test-model".into(),
            timeout_secs: 1,
        },
    }
}

/// Assemble full server resources backed by an in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let config = create_test_config();
    let database = create_test_database().await?;
    let auth_manager = create_test_auth_manager();
    let auth_middleware = AuthMiddleware::new(auth_manager.clone());
    let ai_client = RecipeAiClient::new(config.ai.clone())?;

    Ok(Arc::new(ServerResources {
        database,
        auth_manager,
        auth_middleware,
        ai_client,
        config,
    }))
}

/// Build the application router for the given resources
pub fn create_test_router(resources: Arc<ServerResources>) -> Router {
    server::router(resources)
}

/// Insert a user directly into the database and issue a token for them
///
/// The account password is `"password123"`, hashed at minimum bcrypt cost
/// to keep tests fast.
pub async fn create_test_user(
    resources: &Arc<ServerResources>,
    username: &str,
    email: &str,
) -> Result<(User, String)> {
    let password_hash = bcrypt::hash("password123", 4)?;
    let user = User::new(username.to_owned(), email.to_owned(), password_hash);
    resources.database.users().create(&user).await?;
    let token = resources.auth_manager.generate_token(&user)?;
    Ok((user, token))
}

/// Execute a JSON request against the router and decode the response
pub async fn send_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
