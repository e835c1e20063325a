//! # SupportBot Network Utilities (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! Outbound HTTP used by the helpful-vote feature:
//!
//! - **`votes`**: vote storage (remote PostgREST-style table or in-memory),
//!   the per-client duplicate guard, and `cast_vote` which ties them together.
//! - **`ip`**: best-effort public IP lookup used to identify a voter from
//!   the command line.
//!
//! Both share one `reqwest::Client` built by `build_http_client`, so the
//! configured timeout applies to every outbound call.
//!
pub mod ip;
pub mod votes;

use crate::core::config::VotesConfig;
use crate::core::error::Result;
use anyhow::Context;
use reqwest::Client;
use std::time::Duration;

/// Builds the shared HTTP client with the configured timeout.
pub fn build_http_client(config: &VotesConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("supportbot/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
