// ABOUTME: Database operations for per-user pantry inventory
// ABOUTME: Enforces the pantry item cap and supports expiry-window queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::constants::{error_messages, limits::MAX_PANTRY_ITEMS};
use crate::database::users::parse_timestamp;
use crate::errors::{AppError, AppResult};
use crate::models::PantryItem;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Request to add a pantry item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPantryItemRequest {
    /// Ingredient name
    pub name: String,
    /// Free-text quantity (if provided)
    pub quantity: Option<String>,
    /// Measurement unit (if provided)
    pub unit: Option<String>,
    /// Category for grouping (if provided)
    pub category: Option<String>,
    /// Expiry date (if provided)
    pub expiry_date: Option<NaiveDate>,
}

/// Pantry database operations manager
pub struct PantryManager {
    pool: SqlitePool,
}

impl PantryManager {
    /// Create a new pantry manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run pantry table migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the migration statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS pantry_items (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                quantity TEXT,
                unit TEXT,
                category TEXT,
                expiry_date TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create pantry table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_pantry_user ON pantry_items(user_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create pantry index: {e}")))?;

        Ok(())
    }

    /// List a user's pantry items, most recently added first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<PantryItem>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, quantity, unit, category, expiry_date, created_at
            FROM pantry_items
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list pantry: {e}")))?;

        rows.iter().map(row_to_pantry_item).collect()
    }

    /// Append items to a user's pantry, enforcing the per-user cap
    ///
    /// The count check and inserts run in one transaction. A batch that
    /// would push the pantry past the cap inserts nothing.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the batch would exceed the cap, or a
    /// database error if an insert fails
    pub async fn add_items(
        &self,
        user_id: Uuid,
        requests: &[AddPantryItemRequest],
    ) -> AppResult<Vec<PantryItem>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query("SELECT COUNT(*) as count FROM pantry_items WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to count pantry items: {e}")))?;
        let count: i64 = row.get("count");
        let batch_len = i64::try_from(requests.len())
            .map_err(|_| AppError::invalid_input("Too many pantry items in one request"))?;
        if count + batch_len > MAX_PANTRY_ITEMS {
            return Err(AppError::limit_exceeded(
                error_messages::PANTRY_LIMIT_REACHED,
            ));
        }

        let now = Utc::now();
        let mut items = Vec::with_capacity(requests.len());
        for request in requests {
            let item = PantryItem {
                id: Uuid::new_v4(),
                user_id,
                name: request.name.clone(),
                quantity: request.quantity.clone(),
                unit: request.unit.clone(),
                category: request.category.clone(),
                expiry_date: request.expiry_date,
                created_at: now,
            };

            sqlx::query(
                r"
                INSERT INTO pantry_items (
                    id, user_id, name, quantity, unit, category, expiry_date, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(item.id.to_string())
            .bind(user_id.to_string())
            .bind(&item.name)
            .bind(&item.quantity)
            .bind(&item.unit)
            .bind(&item.category)
            .bind(item.expiry_date.map(|d| d.to_string()))
            .bind(now.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add pantry item: {e}")))?;

            items.push(item);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        Ok(items)
    }

    /// Remove a pantry item owned by the user
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the item does not exist or belongs to
    /// another user
    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM pantry_items WHERE id = $1 AND user_id = $2")
            .bind(item_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to remove pantry item: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Pantry item"));
        }
        Ok(())
    }

    /// Count a user's pantry items
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn count_for_user(&self, user_id: Uuid) -> AppResult<u32> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM pantry_items WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count pantry items: {e}")))?;

        let count: i64 = row.get("count");
        Ok(u32::try_from(count).unwrap_or(0))
    }

    /// List items expiring within the next `days` days, soonest first
    ///
    /// Items without an expiry date are excluded. Already-expired items are
    /// included so the client can surface them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn expiring_within(&self, user_id: Uuid, days: u32) -> AppResult<Vec<PantryItem>> {
        let cutoff = Utc::now().date_naive() + Duration::days(i64::from(days));

        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, quantity, unit, category, expiry_date, created_at
            FROM pantry_items
            WHERE user_id = $1 AND expiry_date IS NOT NULL AND expiry_date <= $2
            ORDER BY expiry_date ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(cutoff.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list expiring items: {e}")))?;

        rows.iter().map(row_to_pantry_item).collect()
    }
}

fn row_to_pantry_item(row: &SqliteRow) -> AppResult<PantryItem> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let expiry_date_str: Option<String> = row.get("expiry_date");
    let created_at_str: String = row.get("created_at");

    let expiry_date = expiry_date_str
        .as_deref()
        .map(|s| {
            s.parse::<NaiveDate>()
                .map_err(|e| AppError::internal(format!("Invalid expiry date in database: {e}")))
        })
        .transpose()?;

    Ok(PantryItem {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        quantity: row.get("quantity"),
        unit: row.get("unit"),
        category: row.get("category"),
        expiry_date,
        created_at: parse_timestamp(&created_at_str)?,
    })
}
