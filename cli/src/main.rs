//! # SupportBot Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `supportbot` CLI, a Korean customer-support assistant
//! that answers questions from a static knowledge base, browses an FAQ
//! catalog, and serves both over HTTP. This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! supportbot --help
//!
//! # Ask one question with debug logging
//! supportbot -vv ask 세금계산서 취소 방법
//!
//! # Use a specific configuration file
//! supportbot --config ./supportbot.toml srv
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level (`RUST_LOG` overrides)
//! 3. Route to the command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (ask, chat, faq, srv, ...)
mod common; // Shared utilities (network)
mod core; // Core infrastructure (errors, config)
mod data; // Data file models and loaders
mod engine; // Matching, tone, dates

#[derive(Parser, Debug)]
#[command(
    name = "supportbot",
    about = "🤖 SupportBot: knowledge-base customer support assistant",
    long_about = "Answer support questions from a static knowledge base, browse the FAQ,\n\
                  validate knowledge files, and serve everything over HTTP.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file to use instead of the project/user files.
    #[arg(long, global = true, env = "SUPPORTBOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Answer a single question.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Chat interactively in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Browse, search, and vote on FAQ items.
    #[command(alias = "f")]
    Faq(commands::faq::FaqArgs),
    /// Show the VAT filing deadline for a date in free text.
    #[command(alias = "d")]
    Deadline(commands::deadline::DeadlineArgs),
    /// Validate a unified knowledge file.
    Validate(commands::validate::ValidateArgs),
    /// Serve the HTTP API (and optional widget).
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Ask(args) => commands::ask::handle_ask(args, config_path).await,
        Commands::Chat(args) => commands::chat::handle_chat(args, config_path).await,
        Commands::Faq(args) => commands::faq::handle_faq(args, config_path).await,
        Commands::Deadline(args) => commands::deadline::handle_deadline(args).await,
        Commands::Validate(args) => commands::validate::handle_validate(args).await,
        Commands::Srv(args) => commands::srv::handle_srv(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
