//! # SupportBot Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: configuration loading, merging, and validation
//! - `error`: error types and the `Result` alias
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{Result, SupportError}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
