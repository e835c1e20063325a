//! # SupportBot Deadline Command
//!
//! File: cli/src/commands/deadline.rs
//!
//! `supportbot deadline <TEXT..>` runs the date extractor on free text and
//! prints the VAT filing deadline for the date it finds.
//!
//! ```bash
//! $ supportbot deadline 11월 20일 거래분
//! Date:     2026년 11월 20일 (2026-11-20)
//! Deadline: 2027년 1월 25일
//! ```
//!
use crate::core::error::Result;
use crate::engine::dates::{extract_date, format_korean_date, vat_deadline};
use anyhow::bail;
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
pub struct DeadlineArgs {
    /// Text containing a date, e.g. "2025년 11월 20일" or "3월 거래분".
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

pub async fn handle_deadline(args: DeadlineArgs) -> Result<()> {
    let text = args.text.join(" ");
    info!("Looking up VAT deadline for: {}", text);
    println!("{}", describe_deadline(&text, chrono::Local::now().date_naive())?);
    Ok(())
}

fn describe_deadline(text: &str, today: NaiveDate) -> Result<String> {
    let Some(date) = extract_date(text, today) else {
        bail!("No date found in '{}'.", text);
    };
    let deadline = match vat_deadline(&date) {
        Some(deadline) => format_korean_date(deadline),
        None => "none (month out of range)".to_string(),
    };
    Ok(format!(
        "Date:     {} ({})\nDeadline: {}",
        date.full_date, date.iso_date, deadline
    ))
}
