// ABOUTME: Health check route reporting service and database status
// ABOUTME: Used by deployment probes and the test harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::server::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Build the health router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /api/health
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_ok = sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
            .is_ok();

        let response = HealthResponse {
            status: if database_ok { "healthy" } else { "degraded" },
            service: crate::constants::service_names::LARDER_SERVER,
            version: env!("CARGO_PKG_VERSION"),
            database: if database_ok { "connected" } else { "error" },
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let status = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(response)).into_response()
    }
}
