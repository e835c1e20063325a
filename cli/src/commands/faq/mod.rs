//! # SupportBot FAQ Command Group
//!
//! File: cli/src/commands/faq/mod.rs
//!
//! ## Overview
//!
//! `supportbot faq` is the terminal version of the FAQ browser:
//!
//! - `list`: search and page through items
//! - `show`: print one item, optionally with its helpful count
//! - `categories`: print the category list
//! - `vote`: mark an item as helpful
//!
use crate::core::config::Config;
use crate::core::error::Result;
use crate::data::FaqCatalog;
use anyhow::Context;
use clap::{Parser, Subcommand};

mod categories;
mod list;
mod show;
mod vote;

#[derive(Parser, Debug)]
pub struct FaqArgs {
    #[command(subcommand)]
    command: FaqCommand,
}

#[derive(Subcommand, Debug)]
enum FaqCommand {
    /// Search and list FAQ items, one page at a time.
    #[command(alias = "ls")]
    List(list::ListArgs),
    /// Show one FAQ item.
    Show(show::ShowArgs),
    /// List FAQ categories.
    Categories(categories::CategoriesArgs),
    /// Mark an FAQ item as helpful.
    Vote(vote::VoteArgs),
}

pub async fn handle_faq(args: FaqArgs, config_path: Option<&std::path::Path>) -> Result<()> {
    match args.command {
        FaqCommand::List(args) => list::handle_list(args, config_path).await,
        FaqCommand::Show(args) => show::handle_show(args, config_path).await,
        FaqCommand::Categories(args) => categories::handle_categories(args, config_path).await,
        FaqCommand::Vote(args) => vote::handle_vote(args, config_path).await,
    }
}

/// Loads the FAQ file named in the configuration.
fn load_catalog(cfg: &Config) -> Result<FaqCatalog> {
    let path = cfg.data.faq_path();
    FaqCatalog::load(&path).with_context(|| format!("Failed to load FAQ from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_faq_list_with_filters() {
        let args = FaqArgs::try_parse_from([
            "faq", "list", "--search", "취소", "--category", "세금계산서", "--page", "2",
        ])
        .unwrap();
        assert!(matches!(args.command, FaqCommand::List(_)));
    }

    #[test]
    fn test_parses_faq_show_and_vote() {
        let show = FaqArgs::try_parse_from(["faq", "show", "faq-1", "--votes"]).unwrap();
        assert!(matches!(show.command, FaqCommand::Show(_)));
        let vote = FaqArgs::try_parse_from(["faq", "vote", "faq-1"]).unwrap();
        assert!(matches!(vote.command, FaqCommand::Vote(_)));
        assert!(FaqArgs::try_parse_from(["faq", "vote"]).is_err());
    }

    #[test]
    fn test_parses_faq_categories_and_alias() {
        let args = FaqArgs::try_parse_from(["faq", "categories"]).unwrap();
        assert!(matches!(args.command, FaqCommand::Categories(_)));
        let alias = FaqArgs::try_parse_from(["faq", "ls"]).unwrap();
        assert!(matches!(alias.command, FaqCommand::List(_)));
    }
}
