//! # FAQ Vote Command
//!
//! File: cli/src/commands/faq/vote.rs
//!
//! Marks an FAQ item as helpful. The voter is identified by the machine's
//! public IP (looked up via `votes.ip_lookup_url`, `"unknown"` on failure).
//! Without a configured vote endpoint the vote only lives as long as this
//! process, which makes the command useful mainly against a remote table.
//!
use super::load_catalog;
use crate::common::network::{
    build_http_client,
    ip::lookup_public_ip,
    votes::{cast_vote, VoteBackend, VoteGuard},
};
use crate::core::config;
use crate::core::error::{Result, SupportError};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
pub struct VoteArgs {
    /// FAQ item id.
    id: String,
}

pub async fn handle_vote(args: VoteArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(config_path).context("Failed to load SupportBot configuration")?;
    let catalog = load_catalog(&cfg)?;
    if catalog.get(&args.id).is_none() {
        return Err(SupportError::FaqNotFound { id: args.id }.into());
    }

    let client = build_http_client(&cfg.votes)?;
    let backend = VoteBackend::from_config(&cfg.votes, client.clone());
    if matches!(backend, VoteBackend::Memory(_)) {
        warn!("No vote endpoint configured; this vote will not be persisted.");
    }

    let voter = lookup_public_ip(&client, &cfg.votes.ip_lookup_url).await;
    info!("Casting helpful vote for '{}' as {}", args.id, voter);
    let count = cast_vote(&backend, &VoteGuard::default(), &args.id, &voter).await?;

    println!("Marked '{}' as helpful ({} vote{}).", args.id, count, if count == 1 { "" } else { "s" });
    Ok(())
}
