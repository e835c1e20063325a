//! # Text Normalization
//!
//! File: cli/src/engine/normalize.rs
//!
//! Keyword matching is plain substring containment after both sides are
//! lowercased, trimmed and whitespace-collapsed.
//!

/// Lowercases, trims and collapses every whitespace run to a single space.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// # Contains Keywords (`contains_keywords`)
///
/// Returns `true` if the normalized `query` contains any normalized keyword.
/// Keywords that normalize to an empty string are ignored, otherwise a stray
/// `""` in a data file would match every query.
pub fn contains_keywords<S: AsRef<str>>(query: &str, keywords: &[S]) -> bool {
    let normalized_query = normalize_text(query);
    keywords.iter().any(|keyword| {
        let keyword = normalize_text(keyword.as_ref());
        !keyword.is_empty() && normalized_query.contains(&keyword)
    })
}
