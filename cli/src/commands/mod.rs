//! # SupportBot Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level commands of the `supportbot` CLI. Each module defines its own
//! `clap` arguments struct and an async `handle_*` function that `main.rs`
//! dispatches to. Handlers load configuration themselves from the optional
//! `--config` path.
//!
//! ## Command Groups
//!
//! - `ask`: answer a single question
//! - `chat`: interactive terminal conversation
//! - `deadline`: extract a date and show its VAT filing deadline
//! - `faq`: browse, search, and vote on FAQ items
//! - `srv`: HTTP API (and optional widget) server
//! - `validate`: check a unified knowledge file
//!

/// Answers one question and exits.
pub mod ask;
/// Interactive terminal chat loop.
pub mod chat;
/// Date extraction and VAT deadline lookup.
pub mod deadline;
/// FAQ browser: `list`, `show`, `categories`, `vote`.
pub mod faq;
/// HTTP API server. Includes configuration, handlers, and server logic.
pub mod srv;
/// Knowledge file validator.
pub mod validate;
