//! # Answer Engine
//!
//! File: cli/src/engine/mod.rs
//!
//! ## Overview
//!
//! Everything needed to turn a free-text question into a canned answer:
//!
//! - **`normalize`**: text normalization and keyword containment.
//! - **`synonyms`**: query expansion from the dataset's synonym dictionary.
//! - **`tone`**: formal/casual tone and its detection from wording.
//! - **`matcher`**: first-hit lookup over the knowledge base, then the dataset.
//! - **`dates`**: date extraction and VAT filing deadlines.
//! - **`placeholders`**: `{today}` / `{date}` / `{deadline}` substitution.
//! - **`assistant`**: the facade that ties the above together.
//!
pub mod assistant;
pub mod dates;
pub mod matcher;
pub mod normalize;
pub mod placeholders;
pub mod synonyms;
pub mod tone;

pub use assistant::{Assistant, Reply};
pub use tone::Tone;
