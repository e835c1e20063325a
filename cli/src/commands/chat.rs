//! # SupportBot Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! `supportbot chat` opens a read-eval-print loop against the assistant.
//! Each reply is stamped with the local time, like a messenger window:
//!
//! ```text
//! You: 세금계산서 취소 방법 알려줘
//! [14:05] Billy: 승인번호로 취소하면 돼.
//! ```
//!
//! ## In-chat commands
//!
//! - `/tone formal`, `/tone casual`: pin the reply tone
//! - `/tone auto`: go back to detecting the tone per message
//! - `/help`: list these commands
//! - `bye` or `/quit`: leave the chat
//!
//! The loop is written against `BufRead`/`Write` so it can be driven by tests.
//!
use super::ask::format_reply;
use crate::core::config;
use crate::core::error::{Result, SupportError};
use crate::engine::{Assistant, Tone};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Pin the reply tone (formal or casual). Detected per message when omitted.
    #[arg(short, long)]
    tone: Option<Tone>,
}

const HELP_TEXT: &str = "Commands:\n  /tone formal|casual|auto  change how I answer\n  /help                     show this help\n  bye, /quit                leave the chat";

pub async fn handle_chat(args: ChatArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(config_path).context("Failed to load SupportBot configuration")?;
    let assistant = Assistant::load(&cfg)?;
    let tone = args.tone.or(assistant.default_tone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_chat(
        &assistant,
        tone,
        stdin.lock(),
        stdout.lock(),
        || Local::now().format("%H:%M").to_string(),
        || Local::now().date_naive(),
    )
}

/// Runs the chat loop until `bye`, `/quit`, or end of input.
fn run_chat<R, W, C, D>(
    assistant: &Assistant,
    mut tone: Option<Tone>,
    mut input: R,
    mut output: W,
    clock: C,
    today: D,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Fn() -> String,
    D: Fn() -> NaiveDate,
{
    let name = assistant.bot_name().to_string();
    writeln!(
        output,
        "Chat with {}! Type '/help' for commands, 'bye' to quit.",
        name
    )?;

    loop {
        write!(output, "You: ")?;
        output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        if message.eq_ignore_ascii_case("bye") || message == "/quit" {
            writeln!(output, "[{}] {}: 안녕히 가세요!", clock(), name)?;
            break;
        }

        if message == "/help" {
            writeln!(output, "{}", HELP_TEXT)?;
            continue;
        }

        if let Some(setting) = message.strip_prefix("/tone") {
            match setting.trim() {
                "auto" => {
                    tone = None;
                    writeln!(output, "Tone: detected from each message.")?;
                }
                other => match other.parse::<Tone>() {
                    Ok(parsed) => {
                        tone = Some(parsed);
                        writeln!(output, "Tone: {}.", parsed)?;
                    }
                    Err(e) => writeln!(output, "{}", e)?,
                },
            }
            continue;
        }

        debug!("Chat message: {}", message);
        match assistant.reply(message, tone, today()) {
            Ok(reply) => writeln!(output, "[{}] {}: {}", clock(), name, format_reply(&reply))?,
            Err(e) => match e.downcast_ref::<SupportError>() {
                Some(SupportError::EmptyQuery) => continue,
                _ => {
                    warn!("Failed to answer chat message: {:#}", e);
                    writeln!(output, "[{}] {} (error): {}", clock(), name, e)?;
                }
            },
        }
    }

    Ok(())
}
