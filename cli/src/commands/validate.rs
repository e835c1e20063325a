//! # SupportBot Validate Command
//!
//! File: cli/src/commands/validate.rs
//!
//! ## Overview
//!
//! `supportbot validate --file knowledge.json [--strict]` checks a unified
//! knowledge file before it is shipped and prints a report:
//!
//! ```text
//! Validating data/knowledge.json
//!
//! Statistics:
//!   Items:               42
//!   Synonym groups:      12
//!   Types:               intent 30, knowledge 10, case 2
//!   ...
//!
//! Errors (1):
//!   - [vat-02] priority must be an integer between 1 and 10, got 11.
//!
//! Result: FAILED
//! ```
//!
//! The command exits non-zero when the file has errors. Warnings never fail
//! the check.
//!
use crate::core::error::{Result, SupportError};
use crate::data::read_json_file;
use crate::data::validator::{KnowledgeValidator, ValidationReport};
use clap::Parser;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the unified knowledge file.
    #[arg(short, long)]
    file: PathBuf,

    /// Also warn about thin keyword lists and short responses.
    #[arg(long)]
    strict: bool,
}

pub async fn handle_validate(args: ValidateArgs) -> Result<()> {
    info!(
        "Validating {} (strict: {})",
        args.file.display(),
        args.strict
    );
    let data: Value = read_json_file(&args.file)?;
    let report = KnowledgeValidator::new(args.strict).validate(&data);

    println!("Validating {}\n", args.file.display());
    println!("{}", format_report(&report));

    if !report.is_valid() {
        return Err(SupportError::ValidationFailed {
            errors: report.errors.len(),
        }
        .into());
    }
    Ok(())
}

fn format_report(report: &ValidationReport) -> String {
    let stats = &report.stats;
    let join_counts = |counts: &IndexMap<String, usize>| {
        if counts.is_empty() {
            "-".to_string()
        } else {
            counts
                .iter()
                .map(|(name, count)| format!("{} {}", name, count))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    let priorities: IndexMap<String, usize> = stats
        .priority_distribution
        .iter()
        .map(|(priority, count)| (priority.to_string(), *count))
        .collect();

    let mut lines = vec![
        "Statistics:".to_string(),
        format!("  Items:               {}", stats.total_items),
        format!("  Synonym groups:      {}", stats.total_synonyms),
        format!("  Types:               {}", join_counts(&stats.type_distribution)),
        format!("  Categories:          {}", join_counts(&stats.category_distribution)),
        format!("  Priorities:          {}", join_counts(&priorities)),
        format!("  Keywords per item:   {:.1}", stats.avg_keywords_per_item),
        format!(
            "  Avg response chars:  formal {:.1}, casual {:.1}, plain {:.1}",
            stats.avg_response_length.formal,
            stats.avg_response_length.casual,
            stats.avg_response_length.plain
        ),
    ];

    for (title, messages) in [("Errors", &report.errors), ("Warnings", &report.warnings)] {
        if !messages.is_empty() {
            lines.push(String::new());
            lines.push(format!("{} ({}):", title, messages.len()));
            lines.extend(messages.iter().map(|m| format!("  - {}", m)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Result: {}",
        if report.is_valid() { "OK" } else { "FAILED" }
    ));
    lines.join("\n")
}
