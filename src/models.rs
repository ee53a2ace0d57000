// ABOUTME: Core data models for the Larder recipe API
// ABOUTME: Defines User, Recipe, PantryItem and their supporting enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! Core data models and types.
//!
//! This module is the canonical data shape for the application. The original
//! client variants disagreed on field names (`name` vs `title`, `is_fav` vs
//! `isFavorite`); everything here uses `title` and a per-user computed
//! `is_favorite`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cooking skill level for user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => Self::Beginner,
        }
    }
}

/// Meal planning cadence for user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealPlanning {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl MealPlanning {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "daily" => Self::Daily,
            "monthly" => Self::Monthly,
            _ => Self::Weekly,
        }
    }
}

/// User role for access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// Dietary and cooking preferences embedded in the user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// Dietary restrictions (e.g. "vegetarian", "gluten-free")
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Preferred recipe categories
    #[serde(default)]
    pub favorite_categories: Vec<String>,
    /// Known allergies
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Self-assessed cooking skill
    #[serde(default)]
    pub cooking_skill_level: SkillLevel,
    /// Preferred cuisines
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
    /// Meal planning cadence
    #[serde(default)]
    pub meal_planning: MealPlanning,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Unique display name, 3-30 characters
    pub username: String,
    /// Unique email address, stored lowercased
    pub email: String,
    /// Bcrypt password hash (never serialized to clients)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Avatar path
    pub avatar: String,
    /// Dietary and cooking preferences
    pub preferences: UserPreferences,
    /// Role for access control
    pub role: UserRole,
    /// Whether the account is active
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful login
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with default preferences
    #[must_use]
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email: email.to_lowercase(),
            password_hash,
            avatar: "/uploads/avatars/default.png".into(),
            preferences: UserPreferences::default(),
            role: UserRole::User,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Easy" => Self::Easy,
            "Hard" => Self::Hard,
            _ => Self::Medium,
        }
    }
}

/// Recipe category for organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Beverage,
    #[default]
    Other,
}

impl RecipeCategory {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Dessert => "Dessert",
            Self::Snack => "Snack",
            Self::Beverage => "Beverage",
            Self::Other => "Other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Breakfast" => Self::Breakfast,
            "Lunch" => Self::Lunch,
            "Dinner" => Self::Dinner,
            "Dessert" => Self::Dessert,
            "Snack" => Self::Snack,
            "Beverage" => Self::Beverage,
            _ => Self::Other,
        }
    }
}

/// A single recipe ingredient with structured quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Quantity (fractions like "1/2" are converted to decimals on input)
    pub quantity: f64,
    /// Measurement unit (e.g. "cup", "g", "piece")
    pub unit: String,
}

/// Optional nutrition facts for a recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NutritionInfo {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

/// A stored recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// User who created the recipe
    pub author_id: Uuid,
    /// Display title, 3-100 characters
    pub title: String,
    /// Description, 10-1000 characters
    pub description: String,
    /// Structured ingredient list (stored as a JSON column)
    pub ingredients: Vec<Ingredient>,
    /// Ordered instruction steps (stored as a JSON column)
    pub instructions: Vec<String>,
    /// Cooking time in minutes, at least 1
    pub cooking_time: u32,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Number of servings, at least 1
    pub servings: u32,
    /// Category for organization
    pub category: RecipeCategory,
    /// Image path
    pub image_url: String,
    /// Tags for filtering and search
    pub tags: Vec<String>,
    /// Optional nutrition facts
    pub nutrition: Option<NutritionInfo>,
    /// Whether the recipe is visible to other users
    pub is_public: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// An item in a user's pantry inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Ingredient name
    pub name: String,
    /// Free-text quantity (the original stored quantities as strings)
    pub quantity: Option<String>,
    /// Measurement unit
    pub unit: Option<String>,
    /// Category for grouping (e.g. "produce", "dairy")
    pub category: Option<String>,
    /// Optional expiry date
    pub expiry_date: Option<NaiveDate>,
    /// When the item was added
    pub created_at: DateTime<Utc>,
}
