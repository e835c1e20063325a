//! # Chatbot Dataset
//!
//! File: cli/src/data/dataset.rs
//!
//! The dataset holds flat Q&A pairs (searched after the knowledge base) and
//! the NLU synonym dictionary used to expand queries before matching.
//!
use super::{null_as_default, parse_json, read_json_file, RelatedGuide};
use crate::core::error::Result;
use crate::engine::tone::Tone;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nlu {
    /// Canonical term → variants, in file order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: IndexMap<String, Vec<String>>,
}

/// A single question/answer record with both registers of the answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QaPair {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub answer_polite: Option<String>,
    #[serde(default)]
    pub answer_casual: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_links: Vec<RelatedGuide>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_up: Vec<String>,
}

impl QaPair {
    /// Keywords followed by the pair's own synonyms.
    pub fn match_terms(&self) -> Vec<&str> {
        self.keywords
            .iter()
            .chain(&self.synonyms)
            .map(String::as_str)
            .collect()
    }

    /// The answer in `tone`, if present and non-empty.
    pub fn answer_for(&self, tone: Tone) -> Option<&str> {
        let answer = match tone {
            Tone::Formal => self.answer_polite.as_deref(),
            Tone::Casual => self.answer_casual.as_deref(),
        };
        answer.filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatbotDataset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nlu: Nlu,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qa_pairs: Vec<QaPair>,
}

impl ChatbotDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let dataset: Self = read_json_file(path)?;
        info!(
            "Loaded {} Q&A pairs and {} synonym groups from {}",
            dataset.qa_pairs.len(),
            dataset.nlu.synonyms.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        parse_json(content, "<chatbot dataset>")
    }
}
