// ABOUTME: Database facade over SQLite with per-domain operation managers
// ABOUTME: Owns the connection pool and runs schema migrations at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # Database Layer
//!
//! SQLite-backed persistence split into per-domain managers. The [`Database`]
//! facade owns the connection pool; each manager borrows it for its own
//! table family. Migrations are idempotent `CREATE TABLE IF NOT EXISTS`
//! statements run at startup.

pub mod favorites;
pub mod pantry;
pub mod recipes;
pub mod users;

pub use favorites::FavoritesManager;
pub use pantry::PantryManager;
pub use recipes::RecipesManager;
pub use users::UsersManager;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Database facade owning the connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or migrations cannot run
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run all schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.users().migrate().await?;
        self.recipes().migrate().await?;
        self.pantry().migrate().await?;
        self.favorites().migrate().await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Access to user operations
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Access to recipe operations
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Access to pantry operations
    #[must_use]
    pub fn pantry(&self) -> PantryManager {
        PantryManager::new(self.pool.clone())
    }

    /// Access to favorites operations
    #[must_use]
    pub fn favorites(&self) -> FavoritesManager {
        FavoritesManager::new(self.pool.clone())
    }

    /// Raw pool access for health checks
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
