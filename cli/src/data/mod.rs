//! # SupportBot Data Files
//!
//! File: cli/src/data/mod.rs
//!
//! ## Overview
//!
//! The assistant is driven entirely by static JSON files that are loaded once
//! at startup and never mutated:
//!
//! - `knowledge`: the keyed knowledge base (keywords + tone-specific responses)
//! - `dataset`: Q&A pairs and the synonym dictionary
//! - `faq`: FAQ items, categories, search and pagination
//! - `validator`: quality checks for the unified knowledge file format
//!
//! Keyed objects in these files are read into `IndexMap`s so they keep file
//! order, because the matcher returns the *first* entry whose keywords match.
//! Fields may be omitted or `null`; both read as empty (`null_as_default`).
//!
use crate::core::error::{Result, SupportError};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs, path::Path};
use tracing::debug;

pub mod dataset;
pub mod faq;
pub mod knowledge;
pub mod validator;

pub use dataset::ChatbotDataset;
pub use faq::FaqCatalog;
pub use knowledge::KnowledgeBase;

/// A link to a help-center guide shown under a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedGuide {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
}

/// Reads and parses a JSON data file.
///
/// I/O failures carry the path as context; malformed JSON becomes
/// `SupportError::DataFile` so the offending file is named in the message.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading data file {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    parse_json(&content, &path.display().to_string())
}

/// Parses JSON text, labelling errors with `origin`.
pub fn parse_json<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|source| {
        SupportError::DataFile {
            path: origin.to_string(),
            source,
        }
        .into()
    })
}

/// Reads `null` the same as a missing field. Pair with `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
