// ABOUTME: Environment-based configuration loading for the Larder server
// ABOUTME: Parses env vars into typed config with development-safe defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use anyhow::{Context, Result};
use std::env;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
    Testing,
}

impl Environment {
    /// Parse environment from string value
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Testing => "testing",
        }
    }
}

/// Configuration for the external AI recipe-generation service
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the chat-completions endpoint
    pub base_url: String,
    /// API key sent as a bearer token; never exposed to clients
    pub api_key: Option<String>,
    /// Model identifier requested from the service
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AiConfig {
    fn from_env() -> Self {
        Self {
            base_url: env_or("AI_BASE_URL", "https://api.openai.com/v1"),
            api_key: env::var("AI_API_KEY").ok(),
            model: env_or("AI_MODEL", "gpt-4o-mini"),
            timeout_secs: env_parse_or("AI_TIMEOUT_SECS", 30),
        }
    }
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port the server binds to
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database connection URL
    pub database_url: String,
    /// Secret used to sign and verify JWT tokens
    pub jwt_secret: String,
    /// Maximum number of database connections in the pool
    pub max_connections: u32,
    /// Allowed CORS origins, comma-separated; `*` allows any origin
    pub cors_origins: Vec<String>,
    /// External AI service configuration
    pub ai: AiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Missing values fall back to development defaults with a warning.
    /// Production deployments must set `JWT_SECRET` and `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but not a valid port number,
    /// or if production mode is missing a `JWT_SECRET`
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        );

        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT value: {port}"))?,
            Err(_) => 8080,
        };

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!("DATABASE_URL not set, using default sqlite:larder.db");
            "sqlite:larder.db".into()
        });

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if environment == Environment::Production => {
                anyhow::bail!("JWT_SECRET must be set in production");
            }
            Err(_) => {
                tracing::warn!(
                    "JWT_SECRET not set, generating a random secret; \
                     sessions will not survive restarts"
                );
                let secret = crate::auth::generate_jwt_secret();
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                STANDARD.encode(secret)
            }
        };

        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            http_port,
            environment,
            database_url,
            jwt_secret,
            max_connections: env_parse_or("DATABASE_MAX_CONNECTIONS", 10),
            cors_origins,
            ai: AiConfig::from_env(),
        })
    }

    /// Summary string for startup logging, with secrets omitted
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} port={} database={} ai_model={} ai_key_configured={}",
            self.environment.as_str(),
            self.http_port,
            self.database_url,
            self.ai.model,
            self.ai.api_key.is_some()
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("production"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("anything-else"),
            Environment::Development
        );
    }

    #[test]
    fn test_environment_as_str() {
        assert_eq!(Environment::Production.as_str(), "production");
        assert_eq!(Environment::Development.as_str(), "development");
    }
}
