// ABOUTME: AI recipe generation via an OpenAI-compatible chat endpoint
// ABOUTME: Prompt building, server-side HTTP client, and strict HTML parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # AI Recipe Generation
//!
//! Calls a configured OpenAI-compatible endpoint server-side (the API key
//! never reaches the browser) and parses the HTML the model returns into a
//! structured recipe draft. Parsing is strict: a response missing its title,
//! ingredient list, or instruction list is rejected rather than padded with
//! defaults.

pub mod client;
pub mod parser;
pub mod prompts;

pub use client::RecipeAiClient;
pub use parser::{parse_recipe_html, RecipeDraft};
