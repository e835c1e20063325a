//! # Synonym Expansion
//!
//! File: cli/src/engine/synonyms.rs
//!
//! Users rarely phrase a question with the exact keyword a content editor
//! chose. Before matching, the query is expanded into variants where one
//! word at a time is swapped for each of its synonyms.
//!
use super::normalize::normalize_text;
use indexmap::IndexMap;

/// Synonym groups in dictionary order: canonical term → variants.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable<'a> {
    groups: Option<&'a IndexMap<String, Vec<String>>>,
}

impl<'a> SynonymTable<'a> {
    pub fn new(groups: &'a IndexMap<String, Vec<String>>) -> Self {
        Self {
            groups: Some(groups),
        }
    }

    /// # Synonyms For (`synonyms_for`)
    ///
    /// Finds the first group whose canonical term or any variant equals
    /// `word` after normalization and returns `[canonical, variants..]`.
    /// A word with no group is its own only synonym.
    pub fn synonyms_for(&self, word: &str) -> Vec<String> {
        let normalized = normalize_text(word);
        self.groups
            .into_iter()
            .flatten()
            .find(|(key, variants)| {
                normalize_text(key) == normalized
                    || variants.iter().any(|v| normalize_text(v) == normalized)
            })
            .map(|(key, variants)| {
                std::iter::once(key.to_string())
                    .chain(variants.iter().cloned())
                    .collect()
            })
            .unwrap_or_else(|| vec![word.to_string()])
    }

    /// # Expand Query (`expand_query`)
    ///
    /// Returns the query itself followed by one variant per (word, synonym)
    /// pair where the synonym differs from the word. Words are split on single
    /// spaces and only the first occurrence of a word is replaced.
    pub fn expand_query(&self, query: &str) -> Vec<String> {
        let mut expanded = vec![query.to_string()];
        for word in query.split(' ') {
            for synonym in self.synonyms_for(word) {
                if synonym != word {
                    expanded.push(query.replacen(word, &synonym, 1));
                }
            }
        }
        expanded
    }
}
