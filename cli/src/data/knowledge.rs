//! # Knowledge Base
//!
//! File: cli/src/data/knowledge.rs
//!
//! The knowledge base is a keyed object of entries. Each entry lists keywords
//! in three tiers (primary, secondary, related) and a composed response per
//! tone (greeting, content, closing). Every field is optional in the file
//! and `null` reads as empty.
//!
//! ```json
//! { "knowledge_base": {
//!     "vat_filing": {
//!       "keywords": { "primary": ["부가세 신고"], "secondary": ["부가가치세"] },
//!       "responses": { "formal": { "greeting": "안녕하세요.", "content": "..." } },
//!       "related_guides": [ { "title": "...", "url": "..." } ],
//!       "follow_up_questions": [ "..." ] } } }
//! ```
//!
use super::{null_as_default, parse_json, read_json_file, RelatedGuide};
use crate::core::error::Result;
use crate::engine::tone::Tone;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Keyword tiers of a knowledge entry. Tiers only differ in how they are
/// curated; the matcher treats them as one list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secondary: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related: Vec<String>,
}

impl KeywordSet {
    /// All keywords, primary first.
    pub fn all(&self) -> Vec<&str> {
        self.primary
            .iter()
            .chain(&self.secondary)
            .chain(&self.related)
            .map(String::as_str)
            .collect()
    }
}

/// A response assembled from up to three paragraphs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposedResponse {
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub closing: Option<String>,
}

impl ComposedResponse {
    /// Joins the non-empty parts with a blank line.
    pub fn render(&self) -> String {
        [&self.greeting, &self.content, &self.closing]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToneResponses {
    #[serde(default)]
    pub formal: Option<ComposedResponse>,
    #[serde(default)]
    pub casual: Option<ComposedResponse>,
}

impl ToneResponses {
    pub fn for_tone(&self, tone: Tone) -> Option<&ComposedResponse> {
        match tone {
            Tone::Formal => self.formal.as_ref(),
            Tone::Casual => self.casual.as_ref(),
        }
    }
}

/// One record of the knowledge base.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: KeywordSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responses: ToneResponses,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_guides: Vec<RelatedGuide>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_up_questions: Vec<String>,
}

/// The loaded knowledge base, entries in file order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, rename = "knowledge_base", deserialize_with = "null_as_default")]
    entries: IndexMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn load(path: &Path) -> Result<Self> {
        let kb: Self = read_json_file(path)?;
        info!(
            "Loaded {} knowledge base entries from {}",
            kb.len(),
            path.display()
        );
        Ok(kb)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        parse_json(content, "<knowledge base>")
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &KnowledgeEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "knowledge_base": {
            "vat_filing": {
                "keywords": { "primary": ["부가세 신고"], "secondary": ["부가가치세"], "related": ["vat"] },
                "responses": {
                    "formal": { "greeting": "안녕하세요.", "content": "신고 기한은 {deadline}입니다.", "closing": "" },
                    "casual": { "content": "{deadline}까지 신고하면 돼!" }
                },
                "related_guides": [ { "title": "신고 가이드", "url": "https://example.com/vat" } ],
                "follow_up_questions": [ "예정신고도 해야 하나요?" ]
            },
            "invoice": { "keywords": { "primary": ["세금계산서"] } }
        }
    }"#;

    #[test]
    fn parses_entries_in_order() {
        let kb = KnowledgeBase::from_json(SAMPLE).unwrap();
        let keys: Vec<&str> = kb.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, ["vat_filing", "invoice"]);
        assert_eq!(kb.len(), 2);
    }

    #[test]
    fn keyword_tiers_are_flattened_primary_first() {
        let kb = KnowledgeBase::from_json(SAMPLE).unwrap();
        let (_, entry) = kb.entries().next().unwrap();
        assert_eq!(entry.keywords.all(), ["부가세 신고", "부가가치세", "vat"]);
    }

    #[test]
    fn composed_response_skips_empty_parts() {
        let kb = KnowledgeBase::from_json(SAMPLE).unwrap();
        let (_, entry) = kb.entries().next().unwrap();
        let formal = entry.responses.for_tone(Tone::Formal).unwrap();
        assert_eq!(formal.render(), "안녕하세요.\n\n신고 기한은 {deadline}입니다.");
        let casual = entry.responses.for_tone(Tone::Casual).unwrap();
        assert_eq!(casual.render(), "{deadline}까지 신고하면 돼!");
    }

    #[test]
    fn null_fields_load_as_empty() {
        let kb = KnowledgeBase::from_json(
            r#"{ "knowledge_base": { "vat": {
                "keywords": { "primary": ["부가세"], "secondary": null, "related": null },
                "responses": { "formal": { "greeting": null, "content": "기한은 {deadline}입니다." }, "casual": null },
                "related_guides": null,
                "follow_up_questions": null
            }, "empty": { "keywords": null, "responses": null } } }"#,
        )
        .unwrap();
        let (_, vat) = kb.entries().next().unwrap();
        assert_eq!(vat.keywords.all(), ["부가세"]);
        assert_eq!(
            vat.responses.for_tone(Tone::Formal).unwrap().render(),
            "기한은 {deadline}입니다."
        );
        assert!(vat.responses.for_tone(Tone::Casual).is_none());
        assert!(vat.related_guides.is_empty());
        assert!(vat.follow_up_questions.is_empty());
        let (_, empty) = kb.entries().nth(1).unwrap();
        assert!(empty.keywords.all().is_empty());

        assert!(KnowledgeBase::from_json(r#"{ "knowledge_base": null }"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_sections_load_as_empty() {
        let kb = KnowledgeBase::from_json("{}").unwrap();
        assert!(kb.is_empty());

        let kb = KnowledgeBase::from_json(SAMPLE).unwrap();
        let (_, invoice) = kb.entries().nth(1).unwrap();
        assert!(invoice.responses.for_tone(Tone::Formal).is_none());
        assert!(invoice.related_guides.is_empty());
    }
}
