// ABOUTME: CORS layer configuration for the HTTP API
// ABOUTME: Wildcard in development, explicit origin list in production
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::config::ServerConfig;
use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Configure CORS from the server config
///
/// `CORS_ALLOWED_ORIGINS="*"` (the default) allows any origin for
/// development; a comma-separated origin list restricts it for production.
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let allow_origin = if config.cors_origins.is_empty()
        || config.cors_origins.iter().any(|o| o == "*")
    {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();

        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
