//! Atrium HTTP API Server
//!
//! This crate exposes workspaces over a REST API and injects workspace
//! context into chat requests before they reach the completion pipeline.

pub mod auth;
pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod server;

use server::{ServerConfig, start_server};
use tracing_subscriber::EnvFilter;

/// Initialize tracing once; `RUST_LOG` takes precedence over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second initialisation (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the Atrium HTTP server with the default configuration
pub async fn start() -> anyhow::Result<()> {
    start_with_config(ServerConfig::default()).await
}

/// Start the Atrium HTTP server with a custom configuration
pub async fn start_with_config(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config.log_level);
    start_server(config).await
}
