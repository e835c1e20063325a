//! # SupportBot Server Command
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! `supportbot srv` exposes the assistant and the FAQ catalog over HTTP for
//! the chat widget and FAQ page, and can serve the built widget itself.
//!
//! - `config`: flags merged with the `[server]` configuration section
//! - `handlers`: JSON endpoints and error-to-status mapping
//! - `server_logic`: router assembly, port selection, graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! supportbot srv
//! supportbot srv --port 9000 --widget-dir ./widget/dist
//! supportbot --config deploy/supportbot.toml srv --host 0.0.0.0
//! ```
//!
use crate::core::config::load_config;
use crate::core::error::Result;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

pub mod config;
pub mod handlers;
pub mod server_logic;

pub async fn handle_srv(args: SrvArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let cfg = load_config(config_path).context("Failed to load SupportBot configuration")?;
    let server_config = config::merge_server_config(args, &cfg.server).await?;
    info!("Effective server config: {:?}", server_config);

    let state = handlers::AppState::load(&cfg)?;
    server_logic::run_server(server_config, Arc::new(state)).await
}
