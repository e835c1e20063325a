//! # Assistant
//!
//! File: cli/src/engine/assistant.rs
//!
//! ## Overview
//!
//! `Assistant` is the one entry point the chat surfaces (terminal loop,
//! `ask`, the HTTP API) talk to. It owns the loaded knowledge base and
//! dataset and turns a user message into a finished reply:
//!
//! 1. Reject blank input.
//! 2. Resolve the tone (explicit, otherwise detected from the wording).
//! 3. Match the query (`matcher::match_query`).
//! 4. Extract a date from the same query and fill `{today}`, `{date}` and
//!    `{deadline}` in the matched response.
//! 5. Fall back to the configured "I don't know" message when nothing matched.
//!
use super::dates::{extract_date, format_korean_date, vat_deadline, ExtractedDate};
use super::matcher::{match_query, MatchSource};
use super::placeholders::replace_dynamic_variables;
use super::tone::{detect_tone, Tone};
use crate::core::config::{ChatConfig, Config};
use crate::core::error::{Result, SupportError};
use crate::data::{ChatbotDataset, KnowledgeBase, RelatedGuide};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

/// A finished answer to one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub found: bool,
    pub tone: Tone,
    pub response: String,
    pub related_guides: Vec<RelatedGuide>,
    pub follow_up_questions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<MatchSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_date: Option<ExtractedDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Assistant {
    knowledge: KnowledgeBase,
    dataset: ChatbotDataset,
    settings: ChatConfig,
}

impl Assistant {
    pub fn new(knowledge: KnowledgeBase, dataset: ChatbotDataset, settings: ChatConfig) -> Self {
        Self {
            knowledge,
            dataset,
            settings,
        }
    }

    /// Loads the knowledge base and dataset named in `config`.
    pub fn load(config: &Config) -> Result<Self> {
        let kb_path = config.data.knowledge_base_path();
        let dataset_path = config.data.dataset_path();
        let knowledge = KnowledgeBase::load(&kb_path)
            .with_context(|| format!("Failed to load knowledge base from {}", kb_path.display()))?;
        let dataset = ChatbotDataset::load(&dataset_path).with_context(|| {
            format!("Failed to load chatbot dataset from {}", dataset_path.display())
        })?;
        info!(
            "Assistant '{}' ready ({} entries, {} Q&A pairs)",
            config.chat.bot_name,
            knowledge.len(),
            dataset.qa_pairs.len()
        );
        Ok(Self::new(knowledge, dataset, config.chat.clone()))
    }

    pub fn bot_name(&self) -> &str {
        &self.settings.bot_name
    }

    pub fn default_tone(&self) -> Option<Tone> {
        self.settings.default_tone
    }

    /// # Reply (`reply`)
    ///
    /// Answers `query` in `tone`, or in the tone detected from the query when
    /// `tone` is `None`. `today` fills `{today}` and supplies the year for
    /// dates written without one.
    ///
    /// ## Errors
    ///
    /// Returns `SupportError::EmptyQuery` for blank input.
    pub fn reply(&self, query: &str, tone: Option<Tone>, today: NaiveDate) -> Result<Reply> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SupportError::EmptyQuery.into());
        }

        let tone = tone.unwrap_or_else(|| detect_tone(query));
        let extracted_date = extract_date(query, today);
        let deadline = extracted_date
            .as_ref()
            .and_then(vat_deadline)
            .map(format_korean_date);
        debug!(
            "Replying in {} tone, extracted date: {:?}",
            tone, extracted_date
        );

        let reply = match match_query(query, tone, &self.knowledge, &self.dataset) {
            Some(hit) => Reply {
                found: true,
                tone,
                response: replace_dynamic_variables(&hit.response, extracted_date.as_ref(), today),
                related_guides: hit.related_guides,
                follow_up_questions: hit.follow_up_questions,
                source: Some(hit.source),
                extracted_date,
                deadline,
            },
            None => Reply {
                found: false,
                tone,
                response: replace_dynamic_variables(
                    &self.settings.fallback_message,
                    extracted_date.as_ref(),
                    today,
                ),
                related_guides: Vec::new(),
                follow_up_questions: Vec::new(),
                source: None,
                extracted_date,
                deadline,
            },
        };
        Ok(reply)
    }
}
