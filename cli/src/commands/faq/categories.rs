//! # FAQ Categories Command
//!
//! File: cli/src/commands/faq/categories.rs
//!
//! Prints each FAQ category with the number of items in it.
//!
use super::load_catalog;
use crate::core::config;
use crate::core::error::Result;
use crate::data::FaqCatalog;
use anyhow::Context;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct CategoriesArgs {}

pub async fn handle_categories(_args: CategoriesArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(config_path).context("Failed to load SupportBot configuration")?;
    let catalog = load_catalog(&cfg)?;
    println!("{}", format_categories(&catalog));
    Ok(())
}

fn format_categories(catalog: &FaqCatalog) -> String {
    let categories = catalog.categories();
    if categories.is_empty() {
        return "No FAQ categories found.".to_string();
    }
    categories
        .iter()
        .map(|name| {
            let count = catalog.items().iter().filter(|i| &i.category == name).count();
            format!("{} ({})", name, count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
