// ABOUTME: Structured logging configuration with JSON and pretty output formats
// ABOUTME: Environment-driven tracing setup shared by the server binary and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # Logging Configuration
//!
//! Structured logging built on `tracing`, configured from the environment.
//! Production deployments use JSON output; development defaults to the
//! human-readable pretty format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured output for log aggregation
    Json,
    /// Human-readable output with colors
    Pretty,
    /// Compact single-line output
    Compact,
}

impl LogFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(anyhow::anyhow!("Invalid log format: {s}")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter directive, e.g. `info` or `larder=debug,sqlx=warn`
    pub filter: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line number in output
    pub include_location: bool,
    /// Include thread IDs in output
    pub include_thread_id: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread_id: false,
        }
    }
}

impl LoggingConfig {
    /// Load logging configuration from environment variables
    ///
    /// Reads `RUST_LOG` for the filter directive and `LOG_FORMAT` for the
    /// output format. Unrecognized formats fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogFormat::Pretty);
        let include_location = env::var("LOG_LOCATION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            filter,
            format,
            include_location,
            include_thread_id: false,
        }
    }

    /// Initialize the global tracing subscriber from this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a subscriber has already been installed or the
    /// filter directive fails to parse
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.filter)
            .or_else(|_| EnvFilter::try_new("info"))
            .map_err(|e| anyhow::anyhow!("Failed to create log filter: {e}"))?;

        let registry = tracing_subscriber::registry().with(filter);

        match self.format {
            LogFormat::Json => {
                registry
                    .with(
                        fmt::layer()
                            .json()
                            .with_file(self.include_location)
                            .with_line_number(self.include_location)
                            .with_thread_ids(self.include_thread_id),
                    )
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
            }
            LogFormat::Pretty => {
                registry
                    .with(
                        fmt::layer()
                            .pretty()
                            .with_file(self.include_location)
                            .with_line_number(self.include_location)
                            .with_thread_ids(self.include_thread_id),
                    )
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
            }
            LogFormat::Compact => {
                registry
                    .with(
                        fmt::layer()
                            .compact()
                            .with_file(self.include_location)
                            .with_line_number(self.include_location)
                            .with_thread_ids(self.include_thread_id),
                    )
                    .try_init()
                    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
            }
        }

        Ok(())
    }
}

/// Initialize logging from the environment, for use by the server binary
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_format_round_trip() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            assert_eq!(format.as_str().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.include_location);
    }

    #[test]
    fn test_every_format_builds_a_subscriber() {
        // The pretty layer needs the subscriber's ansi support; build each
        // format without installing it globally
        let _json = tracing_subscriber::registry().with(fmt::layer().json());
        let _pretty = tracing_subscriber::registry().with(fmt::layer().pretty());
        let _compact = tracing_subscriber::registry().with(fmt::layer().compact());
    }
}
