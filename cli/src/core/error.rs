//! # SupportBot Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout SupportBot. Domain
//! failures that callers need to tell apart (an empty query, an unknown FAQ
//! item, a repeated vote, a failing vote backend) are variants of
//! `SupportError`; everything else is carried as `anyhow::Error` with
//! context attached at each layer.
//!
//! ## Architecture
//!
//! - `SupportError`: a `thiserror` enum for specific, matchable failures
//! - `Result<T>`: a type alias for `anyhow::Result<T>`
//!
//! The HTTP layer (`commands::srv::handlers`) downcasts to `SupportError`
//! to choose a status code, so variants are grouped by how a caller reacts:
//! bad input, missing resource, conflict, upstream failure.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if query.trim().is_empty() {
//!     return Err(SupportError::EmptyQuery.into());
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read data file: {}", path.display()))?;
//!
//! // Pattern matching on error types
//! match err.downcast_ref::<SupportError>() {
//!     Some(SupportError::FaqNotFound { .. }) => StatusCode::NOT_FOUND,
//!     _ => StatusCode::INTERNAL_SERVER_ERROR,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the SupportBot application.
#[derive(Error, Debug)]
pub enum SupportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse data file '{path}'")]
    DataFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Query cannot be empty.")]
    EmptyQuery,

    #[error("Unknown tone '{0}'. Expected 'formal' or 'casual'.")]
    UnknownTone(String),

    #[error("FAQ item '{id}' not found.")]
    FaqNotFound { id: String },

    #[error("FAQ item '{id}' was already marked helpful by this client.")]
    AlreadyVoted { id: String },

    #[error("Vote backend error: {0}")]
    VoteBackend(String),

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Knowledge file validation failed with {errors} error(s).")]
    ValidationFailed { errors: usize },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
