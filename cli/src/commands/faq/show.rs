//! # FAQ Show Command
//!
//! File: cli/src/commands/faq/show.rs
//!
//! Prints one FAQ item as plain text. With `--votes`, the helpful count is
//! fetched from the configured vote storage and shown under the answer.
//!
use super::load_catalog;
use crate::common::network::{build_http_client, votes::VoteBackend};
use crate::core::config;
use crate::core::error::{Result, SupportError};
use crate::data::faq::FaqItem;
use anyhow::Context;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// FAQ item id.
    id: String,

    /// Also show how many readers found the item helpful.
    #[arg(long)]
    votes: bool,
}

pub async fn handle_show(args: ShowArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(config_path).context("Failed to load SupportBot configuration")?;
    let catalog = load_catalog(&cfg)?;
    let item = catalog
        .get(&args.id)
        .ok_or_else(|| SupportError::FaqNotFound {
            id: args.id.clone(),
        })?;

    let helpful = if args.votes {
        let backend = VoteBackend::from_config(&cfg.votes, build_http_client(&cfg.votes)?);
        Some(backend.count(&item.id).await?)
    } else {
        None
    };

    println!("{}", format_item(item, helpful));
    Ok(())
}

fn format_item(item: &FaqItem, helpful: Option<u64>) -> String {
    let mut out = format!("[{}] {}\n\n{}", item.category, item.question, item.plain_text());
    if let Some(count) = helpful {
        out.push_str(&format!("\n\nHelpful: {}", count));
    }
    out
}
