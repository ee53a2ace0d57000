// ABOUTME: Server binary for the Larder recipe and pantry API
// ABOUTME: Loads configuration, initializes logging, and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

//! # Larder Server Binary
//!
//! Starts the recipe-management REST API with user authentication, SQLite
//! persistence, and AI recipe generation.

use anyhow::Result;
use clap::Parser;
use larder::{config::environment::ServerConfig, logging, server};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "larder-server")]
#[command(about = "Larder - recipe and pantry management REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Larder server");
    info!("{}", config.summary());

    let resources = Arc::new(server::ServerResources::new(config).await?);
    server::HttpServer::new(resources).run().await
}
