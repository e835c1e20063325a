//! # FAQ List Command
//!
//! File: cli/src/commands/faq/list.rs
//!
//! ```text
//! $ supportbot faq list --search 취소
//! ID        | Category   | Question
//! ----------+------------+------------------------------
//! faq-003   | 세금계산서 | 발행한 세금계산서를 취소하려면?
//!
//! Page 1 of 1 (1 item).
//! ```
//!
use super::load_catalog;
use crate::core::config;
use crate::core::error::Result;
use crate::data::faq::{FaqPage, FaqQuery};
use anyhow::Context;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only items whose question or answer contains this text.
    #[arg(short, long)]
    search: Option<String>,

    /// Only items in this category.
    #[arg(short, long)]
    category: Option<String>,

    /// Page number, starting at 1.
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Items per page. Defaults to `faq.page_size` from the configuration.
    #[arg(long)]
    page_size: Option<usize>,
}

pub async fn handle_list(args: ListArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(config_path).context("Failed to load SupportBot configuration")?;
    let catalog = load_catalog(&cfg)?;

    let query = FaqQuery {
        search: args.search,
        category: args.category,
        page: args.page,
        page_size: args.page_size.unwrap_or(0),
    };
    let page = catalog.search(&query, cfg.faq.page_size);
    println!("{}", format_page(&page));
    Ok(())
}

fn format_page(page: &FaqPage) -> String {
    if page.items.is_empty() {
        return "No FAQ items found.".to_string();
    }

    let id_width = page.items.iter().map(|i| i.id.chars().count()).max().unwrap_or(0).max(2);
    let cat_width = page
        .items
        .iter()
        .map(|i| i.category.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);

    let mut lines = vec![
        format!("{:<id_width$} | {:<cat_width$} | Question", "ID", "Category"),
        format!("{}-+-{}-+-{}", "-".repeat(id_width), "-".repeat(cat_width), "-".repeat(30)),
    ];
    for item in &page.items {
        lines.push(format!(
            "{:<id_width$} | {:<cat_width$} | {}",
            item.id, item.category, item.question
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Page {} of {} ({} item{}).",
        page.page,
        page.total_pages,
        page.total_items,
        if page.total_items == 1 { "" } else { "s" }
    ));
    lines.join("\n")
}
