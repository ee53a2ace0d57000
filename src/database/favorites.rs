// ABOUTME: Database operations for per-user recipe favorites
// ABOUTME: Toggle runs in a transaction so it cannot favorite a deleted recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::database::recipes::row_to_recipe;
use crate::errors::{AppError, AppResult};
use crate::models::Recipe;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Outcome of a favorite toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The recipe was added to favorites
    Added,
    /// The recipe was removed from favorites
    Removed,
}

/// Favorites database operations manager
pub struct FavoritesManager {
    pool: SqlitePool,
}

impl FavoritesManager {
    /// Create a new favorites manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run favorites table migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the migration statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_favorites (
                user_id TEXT NOT NULL REFERENCES users(id),
                recipe_id TEXT NOT NULL REFERENCES recipes(id),
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, recipe_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create favorites table: {e}")))?;

        Ok(())
    }

    /// Toggle a recipe in the user's favorites
    ///
    /// The existence check, membership check, and mutation run in one
    /// transaction; toggling a recipe deleted by a concurrent request
    /// fails with `ResourceNotFound` instead of leaving a dangling row.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist
    pub async fn toggle(&self, user_id: Uuid, recipe_id: Uuid) -> AppResult<ToggleOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let recipe_exists = sqlx::query("SELECT id FROM recipes WHERE id = $1")
            .bind(recipe_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check recipe: {e}")))?;
        if recipe_exists.is_none() {
            return Err(AppError::not_found("Recipe"));
        }

        let existing = sqlx::query(
            "SELECT recipe_id FROM user_favorites WHERE user_id = $1 AND recipe_id = $2",
        )
        .bind(user_id.to_string())
        .bind(recipe_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to check favorite: {e}")))?;

        let outcome = if existing.is_some() {
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id.to_string())
                .bind(recipe_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to remove favorite: {e}")))?;
            ToggleOutcome::Removed
        } else {
            sqlx::query(
                "INSERT INTO user_favorites (user_id, recipe_id, created_at) VALUES ($1, $2, $3)",
            )
            .bind(user_id.to_string())
            .bind(recipe_id.to_string())
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add favorite: {e}")))?;
            ToggleOutcome::Added
        };

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(outcome)
    }

    /// List the IDs of a user's favorite recipes, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query(
            r"
            SELECT recipe_id FROM user_favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list favorites: {e}")))?;

        rows.iter()
            .map(|row| {
                let id_str: String = row.get("recipe_id");
                Uuid::parse_str(&id_str)
                    .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
            })
            .collect()
    }

    /// List a user's favorite recipes with full recipe data, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_recipes(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.author_id, r.title, r.description, r.ingredients, r.instructions,
                   r.cooking_time, r.difficulty, r.servings, r.category, r.image_url, r.tags,
                   r.nutrition, r.is_public, r.created_at, r.updated_at
            FROM recipes r
            JOIN user_favorites f ON f.recipe_id = r.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list favorite recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Check whether a recipe is in the user's favorites
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn is_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT recipe_id FROM user_favorites WHERE user_id = $1 AND recipe_id = $2",
        )
        .bind(user_id.to_string())
        .bind(recipe_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check favorite: {e}")))?;

        Ok(row.is_some())
    }
}
