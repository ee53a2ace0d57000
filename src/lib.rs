// ABOUTME: Main library entry point for the Larder recipe API
// ABOUTME: Exposes auth, database, routes, and AI generation modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

#![deny(unsafe_code)]

//! # Larder
//!
//! A recipe and pantry management REST API. Users register, author and
//! browse recipes, keep a pantry inventory with expiry tracking, toggle
//! favorites, and generate recipe drafts through a configured AI endpoint.
//!
//! ## Architecture
//!
//! - **`database/`**: SQLite persistence with per-domain managers
//! - **`auth`** / **`middleware/`**: bcrypt + HS256 JWT authentication
//! - **`routes/`**: axum REST handlers per domain
//! - **`ai/`**: prompt building, upstream client, and strict HTML parsing
//! - **`server`**: resource wiring and the HTTP serve loop
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use larder::config::environment::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Larder configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
