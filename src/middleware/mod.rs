// ABOUTME: HTTP middleware for authentication and CORS
// ABOUTME: Shared request-level concerns used by every route module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

pub mod auth;
pub mod cors;

pub use auth::AuthMiddleware;
pub use cors::setup_cors;
