//! # SupportBot Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! ## Overview
//!
//! `supportbot ask` answers one question and exits. It is the scripting
//! counterpart of `supportbot chat`.
//!
//! ## Examples
//!
//! ```bash
//! supportbot ask 세금계산서 취소는 어떻게 하나요?
//! supportbot ask --tone casual 11월 20일 거래분 부가세 언제까지야
//! supportbot ask --json 포인트 충전
//! ```
//!
//! Words after `ask` are joined with single spaces, so the question does not
//! need quoting.
//!
use crate::core::config;
use crate::core::error::Result;
use crate::engine::{Assistant, Reply, Tone};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to ask.
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Reply tone (formal or casual). Detected from the question when omitted.
    #[arg(short, long)]
    tone: Option<Tone>,

    /// Print the full reply as JSON.
    #[arg(long)]
    json: bool,
}

pub async fn handle_ask(args: AskArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config(config_path).context("Failed to load SupportBot configuration")?;
    let assistant = Assistant::load(&cfg)?;

    let query = args.query.join(" ");
    info!("Answering one-shot question: {}", query);

    let tone = args.tone.or(assistant.default_tone());
    let reply = assistant.reply(&query, tone, chrono::Local::now().date_naive())?;

    if args.json {
        let json = serde_json::to_string_pretty(&reply).context("Failed to serialize reply")?;
        println!("{}", json);
    } else {
        println!("{}", format_reply(&reply));
    }
    Ok(())
}

/// Renders a reply for the terminal: the answer, then related guides and
/// follow-up suggestions when there are any.
pub(crate) fn format_reply(reply: &Reply) -> String {
    let mut out = reply.response.clone();

    if !reply.related_guides.is_empty() {
        out.push_str("\n\nRelated guides:");
        for guide in &reply.related_guides {
            if guide.url.is_empty() {
                out.push_str(&format!("\n  - {}", guide.title));
            } else {
                out.push_str(&format!("\n  - {} <{}>", guide.title, guide.url));
            }
        }
    }

    if !reply.follow_up_questions.is_empty() {
        out.push_str("\n\nYou might also ask:");
        for question in &reply.follow_up_questions {
            out.push_str(&format!("\n  - {}", question));
        }
    }

    out
}
