// ABOUTME: REST route modules for the Larder API
// ABOUTME: Each domain contributes an axum Router mounted by the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! REST routes
//!
//! Thin axum handlers delegating to the database managers. Every protected
//! handler authenticates from the `Authorization` header before touching
//! data.

pub mod ai;
pub mod auth;
pub mod health;
pub mod recipes;
pub mod users;

pub use ai::AiRoutes;
pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;
pub use users::UserRoutes;
