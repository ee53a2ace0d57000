// ABOUTME: Database operations for recipes with ownership checks
// ABOUTME: Enforces the per-user authored recipe cap inside a transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::constants::{error_messages, limits::MAX_RECIPES_PER_USER};
use crate::database::users::parse_timestamp;
use crate::errors::{AppError, AppResult};
use crate::models::{Difficulty, Ingredient, NutritionInfo, Recipe, RecipeCategory};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const fn default_true() -> bool {
    true
}

/// Request to create a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Display title
    pub title: String,
    /// Description
    pub description: String,
    /// Structured ingredient list
    pub ingredients: Vec<Ingredient>,
    /// Ordered instruction steps
    pub instructions: Vec<String>,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Difficulty level
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Number of servings
    pub servings: u32,
    /// Category for organization
    #[serde(default)]
    pub category: RecipeCategory,
    /// Image path (if provided)
    pub image_url: Option<String>,
    /// Tags for filtering and search
    #[serde(default)]
    pub tags: Vec<String>,
    /// Nutrition facts (if provided)
    pub nutrition: Option<NutritionInfo>,
    /// Whether the recipe is visible to other users
    #[serde(default = "default_true")]
    pub is_public: bool,
}

/// Request to update an existing recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New title (if provided)
    pub title: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New ingredient list (if provided)
    pub ingredients: Option<Vec<Ingredient>>,
    /// New instruction steps (if provided)
    pub instructions: Option<Vec<String>>,
    /// New cooking time (if provided)
    pub cooking_time: Option<u32>,
    /// New difficulty (if provided)
    pub difficulty: Option<Difficulty>,
    /// New servings count (if provided)
    pub servings: Option<u32>,
    /// New category (if provided)
    pub category: Option<RecipeCategory>,
    /// New image path (if provided)
    pub image_url: Option<String>,
    /// New tags (if provided)
    pub tags: Option<Vec<String>>,
    /// New nutrition facts (if provided)
    pub nutrition: Option<NutritionInfo>,
    /// New visibility (if provided)
    pub is_public: Option<bool>,
}

/// Filter options for listing recipes
#[derive(Debug, Clone, Default)]
pub struct ListRecipesFilter {
    /// Filter by category
    pub category: Option<RecipeCategory>,
    /// Filter by difficulty
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring match on title, description, or tags
    pub search: Option<String>,
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run recipe table migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the migration statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL REFERENCES users(id),
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                ingredients TEXT NOT NULL,
                instructions TEXT NOT NULL,
                cooking_time INTEGER NOT NULL,
                difficulty TEXT NOT NULL,
                servings INTEGER NOT NULL,
                category TEXT NOT NULL,
                image_url TEXT NOT NULL,
                tags TEXT NOT NULL,
                nutrition TEXT,
                is_public INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipes table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create recipe index: {e}")))?;

        Ok(())
    }

    /// Create a new recipe, enforcing the per-user authored cap
    ///
    /// The count check and insert run in one transaction so concurrent
    /// requests cannot push an author past the cap.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the author already has the maximum number
    /// of recipes, or a database error if the insert fails
    pub async fn create(&self, author_id: Uuid, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query("SELECT COUNT(*) as count FROM recipes WHERE author_id = $1")
            .bind(author_id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;
        let count: i64 = row.get("count");
        if count >= MAX_RECIPES_PER_USER {
            return Err(AppError::limit_exceeded(
                error_messages::RECIPE_LIMIT_REACHED,
            ));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let ingredients_json = serde_json::to_string(&request.ingredients)?;
        let instructions_json = serde_json::to_string(&request.instructions)?;
        let tags_json = serde_json::to_string(&request.tags)?;
        let nutrition_json = request
            .nutrition
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let image_url = request
            .image_url
            .clone()
            .unwrap_or_else(|| "default-recipe.jpg".into());

        sqlx::query(
            r"
            INSERT INTO recipes (
                id, author_id, title, description, ingredients, instructions,
                cooking_time, difficulty, servings, category, image_url, tags,
                nutrition, is_public, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            ",
        )
        .bind(id.to_string())
        .bind(author_id.to_string())
        .bind(&request.title)
        .bind(&request.description)
        .bind(&ingredients_json)
        .bind(&instructions_json)
        .bind(i64::from(request.cooking_time))
        .bind(request.difficulty.as_str())
        .bind(i64::from(request.servings))
        .bind(request.category.as_str())
        .bind(&image_url)
        .bind(&tags_json)
        .bind(&nutrition_json)
        .bind(i64::from(request.is_public))
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(Recipe {
            id,
            author_id,
            title: request.title.clone(),
            description: request.description.clone(),
            ingredients: request.ingredients.clone(),
            instructions: request.instructions.clone(),
            cooking_time: request.cooking_time,
            difficulty: request.difficulty,
            servings: request.servings,
            category: request.category,
            image_url,
            tags: request.tags.clone(),
            nutrition: request.nutrition,
            is_public: request.is_public,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a recipe by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, recipe_id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, author_id, title, description, ingredients, instructions,
                   cooking_time, difficulty, servings, category, image_url, tags,
                   nutrition, is_public, created_at, updated_at
            FROM recipes WHERE id = $1
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// List recipes visible to the viewer, newest first
    ///
    /// Visible means public recipes plus the viewer's own private ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, viewer_id: Uuid, filter: &ListRecipesFilter) -> AppResult<Vec<Recipe>> {
        let limit_val = i32::try_from(filter.limit.unwrap_or(50)).unwrap_or(50);
        let offset_val = i32::try_from(filter.offset.unwrap_or(0)).unwrap_or(0);

        let category_filter = filter
            .category
            .map(|c| format!("AND category = '{}'", c.as_str()))
            .unwrap_or_default();
        let difficulty_filter = filter
            .difficulty
            .map(|d| format!("AND difficulty = '{}'", d.as_str()))
            .unwrap_or_default();
        // Placeholders stay in the query regardless of which filters are
        // set so bind positions line up; empty values match everything
        let query = format!(
            r"
            SELECT id, author_id, title, description, ingredients, instructions,
                   cooking_time, difficulty, servings, category, image_url, tags,
                   nutrition, is_public, created_at, updated_at
            FROM recipes
            WHERE (title LIKE $1 OR description LIKE $1 OR tags LIKE $1)
              AND (is_public = 1 OR author_id = $2)
            {category_filter}
            {difficulty_filter}
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "
        );

        let search_pattern = filter
            .search
            .as_ref()
            .map_or_else(|| "%".into(), |s| format!("%{s}%"));

        let rows = sqlx::query(&query)
            .bind(&search_pattern)
            .bind(viewer_id.to_string())
            .bind(limit_val)
            .bind(offset_val)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// List recipes authored by a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, author_id, title, description, ingredients, instructions,
                   cooking_time, difficulty, servings, category, image_url, tags,
                   nutrition, is_public, created_at, updated_at
            FROM recipes
            WHERE author_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(author_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list authored recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Update a recipe; only the author may modify it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist and
    /// `PermissionDenied` if the caller is not the author
    pub async fn update(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Recipe> {
        let existing = self
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        if existing.author_id != user_id {
            return Err(AppError::permission_denied(
                "Only the author can modify this recipe",
            ));
        }

        let now = Utc::now();
        let updated = Recipe {
            title: request.title.clone().unwrap_or(existing.title),
            description: request.description.clone().unwrap_or(existing.description),
            ingredients: request.ingredients.clone().unwrap_or(existing.ingredients),
            instructions: request
                .instructions
                .clone()
                .unwrap_or(existing.instructions),
            cooking_time: request.cooking_time.unwrap_or(existing.cooking_time),
            difficulty: request.difficulty.unwrap_or(existing.difficulty),
            servings: request.servings.unwrap_or(existing.servings),
            category: request.category.unwrap_or(existing.category),
            image_url: request.image_url.clone().unwrap_or(existing.image_url),
            tags: request.tags.clone().unwrap_or(existing.tags),
            nutrition: request.nutrition.or(existing.nutrition),
            is_public: request.is_public.unwrap_or(existing.is_public),
            updated_at: now,
            ..existing
        };

        let ingredients_json = serde_json::to_string(&updated.ingredients)?;
        let instructions_json = serde_json::to_string(&updated.instructions)?;
        let tags_json = serde_json::to_string(&updated.tags)?;
        let nutrition_json = updated
            .nutrition
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r"
            UPDATE recipes SET
                title = $1, description = $2, ingredients = $3, instructions = $4,
                cooking_time = $5, difficulty = $6, servings = $7, category = $8,
                image_url = $9, tags = $10, nutrition = $11, is_public = $12,
                updated_at = $13
            WHERE id = $14 AND author_id = $15
            ",
        )
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(&ingredients_json)
        .bind(&instructions_json)
        .bind(i64::from(updated.cooking_time))
        .bind(updated.difficulty.as_str())
        .bind(i64::from(updated.servings))
        .bind(updated.category.as_str())
        .bind(&updated.image_url)
        .bind(&tags_json)
        .bind(&nutrition_json)
        .bind(i64::from(updated.is_public))
        .bind(now.to_rfc3339())
        .bind(recipe_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        Ok(updated)
    }

    /// Delete a recipe and any favorites pointing at it
    ///
    /// Both deletes run in one transaction, so no favorite can be left
    /// referencing a recipe that is gone.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist and
    /// `PermissionDenied` if the caller is not the author
    pub async fn delete(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query("SELECT author_id FROM recipes WHERE id = $1")
            .bind(recipe_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::not_found("Recipe"));
        };
        let author_id: String = row.get("author_id");
        if author_id != user_id.to_string() {
            return Err(AppError::permission_denied(
                "Only the author can delete this recipe",
            ));
        }

        sqlx::query("DELETE FROM user_favorites WHERE recipe_id = $1")
            .bind(recipe_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove favorites: {e}")))?;

        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(())
    }

    /// Count recipes authored by a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count_by_author(&self, user_id: Uuid) -> AppResult<u32> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM recipes WHERE author_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let count: i64 = row.get("count");
        Ok(u32::try_from(count).unwrap_or(0))
    }
}

pub(crate) fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id_str: String = row.get("id");
    let author_id_str: String = row.get("author_id");
    let ingredients_json: String = row.get("ingredients");
    let instructions_json: String = row.get("instructions");
    let tags_json: String = row.get("tags");
    let nutrition_json: Option<String> = row.get("nutrition");
    let difficulty_str: String = row.get("difficulty");
    let category_str: String = row.get("category");
    let cooking_time: i64 = row.get("cooking_time");
    let servings: i64 = row.get("servings");
    let is_public: i64 = row.get("is_public");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let ingredients: Vec<Ingredient> = serde_json::from_str(&ingredients_json)?;
    let instructions: Vec<String> = serde_json::from_str(&instructions_json)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)?;
    let nutrition: Option<NutritionInfo> = nutrition_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(Recipe {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        author_id: Uuid::parse_str(&author_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        title: row.get("title"),
        description: row.get("description"),
        ingredients,
        instructions,
        cooking_time: u32::try_from(cooking_time).unwrap_or(0),
        difficulty: Difficulty::parse(&difficulty_str),
        servings: u32::try_from(servings).unwrap_or(1),
        category: RecipeCategory::parse(&category_str),
        image_url: row.get("image_url"),
        tags,
        nutrition,
        is_public: is_public == 1,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}
