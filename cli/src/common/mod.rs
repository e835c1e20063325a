//! # SupportBot Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! Shared utilities that are neither command-specific (`commands::`) nor
//! core infrastructure (`core::`).
//!
//! - **`network`**: outbound HTTP for helpful votes and public IP lookup.
//!

/// Outbound HTTP: vote storage and public IP lookup.
pub mod network;
