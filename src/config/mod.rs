// ABOUTME: Configuration module for server runtime settings
// ABOUTME: Re-exports environment-driven configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # Configuration
//!
//! Environment-driven server configuration. All settings have sensible
//! development defaults; production deployments must set `JWT_SECRET`
//! and `DATABASE_URL` explicitly.

pub mod environment;

pub use environment::{AiConfig, Environment, ServerConfig};
