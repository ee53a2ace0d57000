// ABOUTME: Route handlers for recipe CRUD
// ABOUTME: Owner-checked mutations with a per-user favorite flag on reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::{
    auth::AuthResult,
    constants::limits::{
        MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, MIN_DESCRIPTION_LENGTH, MIN_TITLE_LENGTH,
    },
    database::recipes::{CreateRecipeRequest, ListRecipesFilter, UpdateRecipeRequest},
    errors::AppError,
    models::{Difficulty, Ingredient, Recipe, RecipeCategory},
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// A recipe with the caller's favorite flag attached
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Whether the authenticated user has favorited this recipe
    pub is_favorite: bool,
}

/// Response for listing recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub total: u32,
}

/// Query parameters for listing recipes
#[derive(Debug, Deserialize)]
pub struct ListRecipesQuery {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Recipe CRUD routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Build the recipes router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route("/api/recipes/:id", get(Self::handle_get))
            .route("/api/recipes/:id", put(Self::handle_update))
            .route("/api/recipes/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Extract and authenticate the user from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources.auth_middleware.authenticate_request(headers)
    }

    fn parse_recipe_id(id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(id).map_err(|_| AppError::invalid_input(format!("Invalid recipe id: {id}")))
    }

    fn validate_recipe_fields(
        title: Option<&str>,
        description: Option<&str>,
        cooking_time: Option<u32>,
        servings: Option<u32>,
    ) -> Result<(), AppError> {
        if let Some(title) = title {
            if title.len() < MIN_TITLE_LENGTH || title.len() > MAX_TITLE_LENGTH {
                return Err(AppError::invalid_input(
                    "Title must be between 3 and 100 characters",
                ));
            }
        }
        if let Some(description) = description {
            if description.len() < MIN_DESCRIPTION_LENGTH
                || description.len() > MAX_DESCRIPTION_LENGTH
            {
                return Err(AppError::invalid_input(
                    "Description must be between 10 and 1000 characters",
                ));
            }
        }
        if cooking_time == Some(0) {
            return Err(AppError::invalid_input(
                "Cooking time must be at least 1 minute",
            ));
        }
        if servings == Some(0) {
            return Err(AppError::invalid_input("Servings must be at least 1"));
        }
        Ok(())
    }

    fn validate_ingredients(ingredients: &[Ingredient]) -> Result<(), AppError> {
        if ingredients.iter().any(|i| i.quantity < 0.0) {
            return Err(AppError::invalid_input(
                "Ingredient quantities must not be negative",
            ));
        }
        Ok(())
    }

    /// Handle GET /api/recipes - list recipes visible to the caller
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let filter = ListRecipesFilter {
            category: query.category.as_deref().map(RecipeCategory::parse),
            difficulty: query.difficulty.as_deref().map(Difficulty::parse),
            search: query.search,
            limit: query.limit,
            offset: query.offset,
        };

        let recipes = resources.database.recipes().list(auth.user_id, &filter).await?;
        let favorite_ids: HashSet<Uuid> = resources
            .database
            .favorites()
            .list_ids(auth.user_id)
            .await?
            .into_iter()
            .collect();

        let response = ListRecipesResponse {
            total: u32::try_from(recipes.len()).unwrap_or(0),
            recipes: recipes
                .into_iter()
                .map(|recipe| RecipeResponse {
                    is_favorite: favorite_ids.contains(&recipe.id),
                    recipe,
                })
                .collect(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/recipes - create a recipe authored by the caller
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        Self::validate_recipe_fields(
            Some(&request.title),
            Some(&request.description),
            Some(request.cooking_time),
            Some(request.servings),
        )?;
        if request.ingredients.is_empty() {
            return Err(AppError::invalid_input(
                "A recipe needs at least one ingredient",
            ));
        }
        if request.instructions.is_empty() {
            return Err(AppError::invalid_input(
                "A recipe needs at least one instruction step",
            ));
        }
        Self::validate_ingredients(&request.ingredients)?;

        let recipe = resources
            .database
            .recipes()
            .create(auth.user_id, &request)
            .await?;

        tracing::info!(recipe_id = %recipe.id, author = %auth.user_id, "Recipe created");

        let response = RecipeResponse {
            recipe,
            is_favorite: false,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let recipe_id = Self::parse_recipe_id(&id)?;

        let recipe = resources
            .database
            .recipes()
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        // Private recipes are indistinguishable from absent ones
        if !recipe.is_public && recipe.author_id != auth.user_id {
            return Err(AppError::not_found("Recipe"));
        }

        let is_favorite = resources
            .database
            .favorites()
            .is_favorite(auth.user_id, recipe_id)
            .await?;

        let response = RecipeResponse {
            recipe,
            is_favorite,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/recipes/:id - owner-checked update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let recipe_id = Self::parse_recipe_id(&id)?;

        Self::validate_recipe_fields(
            request.title.as_deref(),
            request.description.as_deref(),
            request.cooking_time,
            request.servings,
        )?;
        if let Some(ref ingredients) = request.ingredients {
            Self::validate_ingredients(ingredients)?;
        }

        let recipe = resources
            .database
            .recipes()
            .update(recipe_id, auth.user_id, &request)
            .await?;

        let is_favorite = resources
            .database
            .favorites()
            .is_favorite(auth.user_id, recipe_id)
            .await?;

        let response = RecipeResponse {
            recipe,
            is_favorite,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - owner-checked delete
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let recipe_id = Self::parse_recipe_id(&id)?;

        resources
            .database
            .recipes()
            .delete(recipe_id, auth.user_id)
            .await?;

        tracing::info!(recipe_id = %recipe_id, author = %auth.user_id, "Recipe deleted");

        let response = serde_json::json!({ "msg": "Recipe deleted" });
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
