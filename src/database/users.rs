// ABOUTME: Database operations for user accounts and profiles
// ABOUTME: Handles registration, lookup, and profile updates with uniqueness checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserPreferences, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Fields a user can change on their own profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New username (if provided)
    pub username: Option<String>,
    /// New email (if provided)
    pub email: Option<String>,
    /// New preferences (if provided, replaces the whole preferences object)
    pub preferences: Option<UserPreferences>,
}

/// User database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run user table migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the migration statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                avatar TEXT NOT NULL,
                preferences TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                last_login TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        Ok(())
    }

    /// Create a new user, enforcing unique email and username
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email or username is taken,
    /// or a database error if the insert fails
    pub async fn create(&self, user: &User) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let email_taken = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(&user.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check email: {e}")))?;
        if email_taken.is_some() {
            return Err(AppError::already_exists(error_messages::USER_ALREADY_EXISTS));
        }

        let username_taken = sqlx::query("SELECT id FROM users WHERE username = $1")
            .bind(&user.username)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check username: {e}")))?;
        if username_taken.is_some() {
            return Err(AppError::already_exists(error_messages::USERNAME_TAKEN));
        }

        let preferences_json = serde_json::to_string(&user.preferences)?;

        sqlx::query(
            r"
            INSERT INTO users (
                id, username, email, password_hash, avatar, preferences,
                role, is_active, created_at, last_login
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(&preferences_json)
        .bind(user.role.as_str())
        .bind(i64::from(user.is_active))
        .bind(user.created_at.to_rfc3339())
        .bind(user.last_login.map(|t| t.to_rfc3339()))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(())
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, password_hash, avatar, preferences,
                   role, is_active, created_at, last_login
            FROM users WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email (lowercased before lookup)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, password_hash, avatar, preferences,
                   role, is_active, created_at, last_login
            FROM users WHERE email = $1
            ",
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Record a successful login
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_last_login(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update last login: {e}")))?;

        Ok(())
    }

    /// Update profile fields, re-checking uniqueness for changed identifiers
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user does not exist, or
    /// `ResourceAlreadyExists` if a new email or username is already taken
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> AppResult<User> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query(
            r"
            SELECT id, username, email, password_hash, avatar, preferences,
                   role, is_active, created_at, last_login
            FROM users WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::not_found("User"));
        };
        let existing = row_to_user(&row)?;

        let username = request.username.clone().unwrap_or(existing.username);
        let email = request
            .email
            .as_ref()
            .map_or(existing.email.clone(), |e| e.to_lowercase());
        let preferences = request
            .preferences
            .clone()
            .unwrap_or(existing.preferences);

        if email != existing.email {
            let taken = sqlx::query("SELECT id FROM users WHERE email = $1 AND id != $2")
                .bind(&email)
                .bind(user_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to check email: {e}")))?;
            if taken.is_some() {
                return Err(AppError::already_exists(error_messages::USER_ALREADY_EXISTS));
            }
        }

        let username_taken = sqlx::query("SELECT id FROM users WHERE username = $1 AND id != $2")
            .bind(&username)
            .bind(user_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check username: {e}")))?;
        if username_taken.is_some() {
            return Err(AppError::already_exists(error_messages::USERNAME_TAKEN));
        }

        let preferences_json = serde_json::to_string(&preferences)?;

        sqlx::query(
            r"
            UPDATE users SET username = $1, email = $2, preferences = $3
            WHERE id = $4
            ",
        )
        .bind(&username)
        .bind(&email)
        .bind(&preferences_json)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update profile: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(User {
            username,
            email,
            preferences,
            ..existing
        })
    }

    /// Replace a user's password hash
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user does not exist
    pub async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    /// Delete an account and everything it owns
    ///
    /// Removes the user's favorites, pantry, authored recipes, favorites
    /// other users placed on those recipes, and finally the user row, all
    /// in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user does not exist
    pub async fn delete_account(&self, user_id: Uuid) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let user_id_str = user_id.to_string();

        sqlx::query("DELETE FROM user_favorites WHERE user_id = $1")
            .bind(&user_id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete favorites: {e}")))?;

        sqlx::query(
            "DELETE FROM user_favorites WHERE recipe_id IN \
             (SELECT id FROM recipes WHERE author_id = $1)",
        )
        .bind(&user_id_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete recipe favorites: {e}")))?;

        sqlx::query("DELETE FROM pantry_items WHERE user_id = $1")
            .bind(&user_id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete pantry: {e}")))?;

        sqlx::query("DELETE FROM recipes WHERE author_id = $1")
            .bind(&user_id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipes: {e}")))?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&user_id_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(())
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id_str: String = row.get("id");
    let role_str: String = row.get("role");
    let preferences_json: String = row.get("preferences");
    let is_active: i64 = row.get("is_active");
    let created_at_str: String = row.get("created_at");
    let last_login_str: Option<String> = row.get("last_login");

    let preferences: UserPreferences = serde_json::from_str(&preferences_json)?;

    Ok(User {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        avatar: row.get("avatar"),
        preferences,
        role: UserRole::parse(&role_str),
        is_active: is_active == 1,
        created_at: parse_timestamp(&created_at_str)?,
        last_login: last_login_str.as_deref().map(parse_timestamp).transpose()?,
    })
}

pub(crate) fn parse_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp in database: {e}")))
}
