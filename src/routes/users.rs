// ABOUTME: Route handlers for user profile, preferences, pantry, and favorites
// ABOUTME: Keeps the original client's {msg, pantry, favorites} response shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::{
    auth::AuthResult,
    constants::{
        error_messages,
        limits::{DEFAULT_EXPIRY_WINDOW_DAYS, MIN_PASSWORD_LENGTH},
    },
    database::pantry::AddPantryItemRequest,
    database::users::UpdateProfileRequest,
    database::favorites::ToggleOutcome,
    errors::AppError,
    models::{MealPlanning, PantryItem, Recipe, SkillLevel, User},
    routes::auth::AuthRoutes,
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Full profile with populated relations
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    /// Recipes the user authored
    pub recipes: Vec<Recipe>,
    /// Recipes the user favorited
    pub favorites: Vec<Recipe>,
    /// Pantry inventory
    pub pantry: Vec<PantryItem>,
}

/// Request to update identifying profile fields
#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Partial preference update; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferencesBody {
    pub dietary_restrictions: Option<Vec<String>>,
    pub favorite_categories: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub cooking_skill_level: Option<SkillLevel>,
    pub preferred_cuisines: Option<Vec<String>>,
    pub meal_planning: Option<MealPlanning>,
}

/// Request to change the account password
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request to toggle a recipe in the favorites list
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub recipe_id: Option<String>,
}

/// Bulk pantry append request
#[derive(Debug, Deserialize)]
pub struct AddPantryItemsRequest {
    pub items: Vec<AddPantryItemRequest>,
}

/// Pantry response shape kept from the original client
#[derive(Debug, Serialize)]
pub struct PantryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub pantry: Vec<PantryItem>,
    pub total_items: u32,
}

/// Favorites response shape kept from the original client
#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub favorites: Vec<Recipe>,
}

/// Query parameters for the expiring-items view
#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<u32>,
}

/// Response for the expiring-items view
#[derive(Debug, Serialize)]
pub struct ExpiringResponse {
    pub items: Vec<PantryItem>,
    pub window_days: u32,
}

/// Profile, preferences, pantry, and favorites routes
pub struct UserRoutes;

impl UserRoutes {
    /// Build the users router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/profile", get(Self::handle_get_profile))
            .route("/api/users/profile", put(Self::handle_update_profile))
            .route("/api/users/profile", delete(Self::handle_delete_account))
            .route("/api/users/preferences", put(Self::handle_update_preferences))
            .route("/api/users/password", put(Self::handle_change_password))
            .route("/api/users/pantry", get(Self::handle_get_pantry))
            .route("/api/users/pantry", put(Self::handle_add_pantry_items))
            .route(
                "/api/users/pantry/expiring",
                get(Self::handle_expiring_pantry),
            )
            .route(
                "/api/users/pantry/:item_id",
                delete(Self::handle_remove_pantry_item),
            )
            .route("/api/users/favorites", get(Self::handle_get_favorites))
            .route("/api/users/favorites", put(Self::handle_toggle_favorite))
            .with_state(resources)
    }

    /// Extract and authenticate the user from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        resources.auth_middleware.authenticate_request(headers)
    }

    async fn load_user(resources: &Arc<ServerResources>, user_id: Uuid) -> Result<User, AppError> {
        resources
            .database
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Handle GET /api/users/profile - profile with populated relations
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let user = Self::load_user(&resources, auth.user_id).await?;

        let recipes = resources
            .database
            .recipes()
            .list_by_author(auth.user_id)
            .await?;
        let favorites = resources.database.favorites().list_recipes(auth.user_id).await?;
        let pantry = resources.database.pantry().list_for_user(auth.user_id).await?;

        let response = ProfileResponse {
            user,
            recipes,
            favorites,
            pantry,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/users/profile - change username or email
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpdateProfileBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let username = body.username.map(|u| u.trim().to_string());
        if let Some(ref username) = username {
            AuthRoutes::validate_username(username)?;
        }
        if let Some(ref email) = body.email {
            if !AuthRoutes::is_valid_email(email) {
                return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
            }
        }

        let request = UpdateProfileRequest {
            username,
            email: body.email,
            preferences: None,
        };
        let user = resources
            .database
            .users()
            .update_profile(auth.user_id, &request)
            .await?;

        Ok((StatusCode::OK, Json(user)).into_response())
    }

    /// Handle DELETE /api/users/profile - delete the account and its data
    async fn handle_delete_account(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        resources.database.users().delete_account(auth.user_id).await?;

        tracing::info!(user_id = %auth.user_id, "Account deleted");

        let response = serde_json::json!({ "msg": "Account deleted" });
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/users/preferences - merge-update preference fields
    async fn handle_update_preferences(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpdatePreferencesBody>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let user = Self::load_user(&resources, auth.user_id).await?;

        let mut preferences = user.preferences;
        if let Some(v) = body.dietary_restrictions {
            preferences.dietary_restrictions = v;
        }
        if let Some(v) = body.favorite_categories {
            preferences.favorite_categories = v;
        }
        if let Some(v) = body.allergies {
            preferences.allergies = v;
        }
        if let Some(v) = body.cooking_skill_level {
            preferences.cooking_skill_level = v;
        }
        if let Some(v) = body.preferred_cuisines {
            preferences.preferred_cuisines = v;
        }
        if let Some(v) = body.meal_planning {
            preferences.meal_planning = v;
        }

        let request = UpdateProfileRequest {
            username: None,
            email: None,
            preferences: Some(preferences),
        };
        let user = resources
            .database
            .users()
            .update_profile(auth.user_id, &request)
            .await?;

        Ok((StatusCode::OK, Json(user)).into_response())
    }

    /// Handle PUT /api/users/password - verify the current password, re-hash
    async fn handle_change_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ChangePasswordRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let user = Self::load_user(&resources, auth.user_id).await?;

        if request.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        let current = request.current_password;
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&current, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;
        if !is_valid {
            return Err(AppError::invalid_input("Current password is incorrect"));
        }

        let new_password = request.new_password;
        let new_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&new_password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

        resources
            .database
            .users()
            .update_password_hash(auth.user_id, &new_hash)
            .await?;

        let response = serde_json::json!({ "msg": "Password updated" });
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/users/pantry
    async fn handle_get_pantry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let pantry = resources.database.pantry().list_for_user(auth.user_id).await?;

        let response = PantryResponse {
            msg: None,
            total_items: u32::try_from(pantry.len()).unwrap_or(0),
            pantry,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/users/pantry - bulk append with atomic cap check
    async fn handle_add_pantry_items(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AddPantryItemsRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        if request.items.is_empty() {
            return Err(AppError::invalid_input("No pantry items provided"));
        }
        if request.items.iter().any(|item| item.name.trim().is_empty()) {
            return Err(AppError::invalid_input("Pantry items need a name"));
        }

        resources
            .database
            .pantry()
            .add_items(auth.user_id, &request.items)
            .await?;
        let pantry = resources.database.pantry().list_for_user(auth.user_id).await?;

        let response = PantryResponse {
            msg: Some("Items added to pantry".into()),
            total_items: u32::try_from(pantry.len()).unwrap_or(0),
            pantry,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/users/pantry/:item_id
    async fn handle_remove_pantry_item(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(item_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let item_id = Uuid::parse_str(&item_id)
            .map_err(|_| AppError::invalid_input(format!("Invalid pantry item id: {item_id}")))?;

        resources
            .database
            .pantry()
            .remove_item(auth.user_id, item_id)
            .await?;
        let pantry = resources.database.pantry().list_for_user(auth.user_id).await?;

        let response = PantryResponse {
            msg: Some("Item removed from pantry".into()),
            total_items: u32::try_from(pantry.len()).unwrap_or(0),
            pantry,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/users/pantry/expiring?days=N
    async fn handle_expiring_pantry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ExpiringQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let days = query
            .days
            .unwrap_or(u32::try_from(DEFAULT_EXPIRY_WINDOW_DAYS).unwrap_or(7));

        let items = resources
            .database
            .pantry()
            .expiring_within(auth.user_id, days)
            .await?;

        let response = ExpiringResponse {
            items,
            window_days: days,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/users/favorites
    async fn handle_get_favorites(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let favorites = resources.database.favorites().list_recipes(auth.user_id).await?;

        let response = FavoritesResponse {
            msg: None,
            favorites,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/users/favorites - toggle a recipe's membership
    async fn handle_toggle_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ToggleFavoriteRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let recipe_id = request
            .recipe_id
            .ok_or_else(|| AppError::invalid_input("recipe_id is required"))?;
        let recipe_id = Uuid::parse_str(&recipe_id)
            .map_err(|_| AppError::invalid_input(format!("Invalid recipe id: {recipe_id}")))?;

        let outcome = resources
            .database
            .favorites()
            .toggle(auth.user_id, recipe_id)
            .await?;
        let favorites = resources.database.favorites().list_recipes(auth.user_id).await?;

        let msg = match outcome {
            ToggleOutcome::Added => "Recipe added to favorites",
            ToggleOutcome::Removed => "Recipe removed from favorites",
        };
        let response = FavoritesResponse {
            msg: Some(msg.into()),
            favorites,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
