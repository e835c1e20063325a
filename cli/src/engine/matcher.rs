//! # Query Matcher
//!
//! File: cli/src/engine/matcher.rs
//!
//! ## Overview
//!
//! Matching is a linear, first-hit scan with no scoring:
//!
//! 1. Expand the query with synonyms (`SynonymTable::expand_query`).
//! 2. Walk the knowledge base in file order. An entry matches when any
//!    expanded query contains any of its keywords *and* it has a response in
//!    the requested tone. Entries without that tone are skipped.
//! 3. If nothing matched, walk the dataset's Q&A pairs the same way, using
//!    their keywords plus their own synonyms and the tone's answer.
//!
//! The knowledge base therefore always wins over the dataset, and earlier
//! entries win over later ones.
//!
use super::normalize::contains_keywords;
use super::synonyms::SynonymTable;
use super::tone::Tone;
use crate::data::{ChatbotDataset, KnowledgeBase, RelatedGuide};
use serde::Serialize;
use tracing::debug;

/// Where a match came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum MatchSource {
    KnowledgeBase(String),
    QaPair(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub response: String,
    pub related_guides: Vec<RelatedGuide>,
    pub follow_up_questions: Vec<String>,
    pub source: MatchSource,
}

/// # Match Query (`match_query`)
///
/// Returns the first response whose keywords are contained in `query` (or one
/// of its synonym expansions), in the requested `tone`. `None` means nothing
/// in either data set matched.
pub fn match_query(
    query: &str,
    tone: Tone,
    knowledge: &KnowledgeBase,
    dataset: &ChatbotDataset,
) -> Option<MatchResult> {
    let expanded = SynonymTable::new(&dataset.nlu.synonyms).expand_query(query);
    debug!("Expanded '{}' into {} variant(s)", query, expanded.len());

    let hits = |keywords: &[&str]| expanded.iter().any(|q| contains_keywords(q, keywords));

    for (key, entry) in knowledge.entries() {
        let Some(response) = entry.responses.for_tone(tone) else {
            continue;
        };
        if hits(&entry.keywords.all()) {
            debug!("Knowledge base entry '{}' matched in {} tone", key, tone);
            return Some(MatchResult {
                response: response.render(),
                related_guides: entry.related_guides.clone(),
                follow_up_questions: entry.follow_up_questions.clone(),
                source: MatchSource::KnowledgeBase(key.to_string()),
            });
        }
    }

    for pair in &dataset.qa_pairs {
        let Some(answer) = pair.answer_for(tone) else {
            continue;
        };
        if hits(&pair.match_terms()) {
            debug!("Q&A pair {:?} matched in {} tone", pair.id, tone);
            return Some(MatchResult {
                response: answer.to_string(),
                related_guides: pair.related_links.clone(),
                follow_up_questions: pair.follow_up.clone(),
                source: MatchSource::QaPair(pair.id.clone()),
            });
        }
    }

    debug!("No match for '{}'", query);
    None
}
