// ABOUTME: Route handler for AI recipe generation
// ABOUTME: Calls the configured endpoint server-side and returns a parsed draft
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::{
    ai::parser::{parse_recipe_html, RecipeDraft},
    auth::AuthResult,
    errors::AppError,
    server::ServerResources,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to generate a recipe draft
#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    /// Free-text description of what to cook
    pub instructions: String,
    /// Ingredient names to prefer, usually pantry selections
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Response carrying the parsed draft for user confirmation
#[derive(Debug, Serialize)]
pub struct GenerateRecipeResponse {
    pub draft: RecipeDraft,
}

/// AI generation routes
pub struct AiRoutes;

impl AiRoutes {
    /// Build the AI router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ai/generate", post(Self::handle_generate))
            .with_state(resources)
    }

    /// Extract and authenticate the user from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources.auth_middleware.authenticate_request(headers)
    }

    /// Handle POST /api/ai/generate
    ///
    /// The draft is not persisted; saving goes through `POST /api/recipes`.
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<GenerateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        if request.instructions.trim().is_empty() {
            return Err(AppError::invalid_input("instructions must not be empty"));
        }

        tracing::info!(
            user_id = %auth.user_id,
            ingredient_count = request.ingredients.len(),
            "AI recipe generation requested"
        );

        let html = resources
            .ai_client
            .generate_recipe_html(&request.instructions, &request.ingredients)
            .await?;
        let draft = parse_recipe_html(&html)?;

        let response = GenerateRecipeResponse { draft };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
