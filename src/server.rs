// ABOUTME: Server wiring: shared resources, router composition, and serving
// ABOUTME: Builds one axum Router from the per-domain route modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # HTTP Server
//!
//! Wires configuration, database, auth, and the AI client into a single
//! [`ServerResources`] shared by every route module, then serves the
//! composed router.

use crate::{
    ai::RecipeAiClient,
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    middleware::{setup_cors, AuthMiddleware},
    routes::{AiRoutes, AuthRoutes, HealthRoutes, RecipeRoutes, UserRoutes},
};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database facade
    pub database: Database,
    /// Token issuing and validation
    pub auth_manager: AuthManager,
    /// Request authentication
    pub auth_middleware: AuthMiddleware,
    /// AI generation client
    pub ai_client: RecipeAiClient,
    /// Runtime configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Connect the database and assemble shared resources
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection or AI client setup fails
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let database = Database::new(&config.database_url, config.max_connections).await?;
        let auth_manager = AuthManager::new(config.jwt_secret.as_bytes().to_vec());
        let auth_middleware = AuthMiddleware::new(auth_manager.clone());
        let ai_client =
            RecipeAiClient::new(config.ai.clone()).context("Failed to build AI client")?;

        Ok(Self {
            database,
            auth_manager,
            auth_middleware,
            ai_client,
            config,
        })
    }
}

/// Compose the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()))
        .merge(AiRoutes::routes(resources.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors(&resources.config))
}

/// The Larder HTTP server
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Build a server from assembled resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Bind the configured port and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails
    pub async fn run(self) -> Result<()> {
        let port = self.resources.config.http_port;
        let app = router(self.resources);

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("Failed to bind HTTP port {port}"))?;

        tracing::info!("Larder server listening on port {port}");
        axum::serve(listener, app)
            .await
            .context("HTTP server exited with error")?;

        Ok(())
    }
}
