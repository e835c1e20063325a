//! # FAQ Catalog
//!
//! File: cli/src/data/faq.rs
//!
//! ## Overview
//!
//! The FAQ browser shows static question/answer items grouped by category,
//! with a text search and page-by-page navigation. Answers are either a list
//! of typed content blocks or, for older items, a plain `answer` string plus
//! image URLs.
//!
//! ## Search semantics
//!
//! 1. Keep items in the requested category (exact match), if one is given.
//! 2. Keep items whose question, legacy answer or any textual content block
//!    contains the normalized search text.
//! 3. Slice the survivors into 1-based pages. The page number is clamped to
//!    the available range, so asking for page 99 of 3 returns page 3.
//!
use super::{parse_json, read_json_file};
use crate::core::error::Result;
use crate::engine::normalize::normalize_text;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// One block of a structured FAQ answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    List {
        #[serde(default)]
        items: Vec<String>,
    },
    Image {
        url: String,
        #[serde(default)]
        alt: String,
    },
    Note {
        text: String,
    },
    /// Block types this version does not know how to render.
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    fn render(&self) -> Option<String> {
        match self {
            ContentBlock::Text { text } => Some(text.clone()),
            ContentBlock::List { items } => Some(
                items
                    .iter()
                    .map(|item| format!("• {}", item))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            ContentBlock::Image { url, alt } => Some(format!("[image: {}]({})", alt, url)),
            ContentBlock::Note { text } => Some(format!("※ {}", text)),
            ContentBlock::Unsupported => None,
        }
    }

    /// Text fragments that search looks at, each matched on its own.
    fn searchable_texts(&self) -> Vec<&str> {
        match self {
            ContentBlock::Text { text } | ContentBlock::Note { text } => vec![text.as_str()],
            ContentBlock::List { items } => items.iter().map(String::as_str).collect(),
            ContentBlock::Image { alt, .. } => vec![alt.as_str()],
            ContentBlock::Unsupported => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentBlock>,
    /// Legacy plain-text answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Legacy image URLs accompanying `answer`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl FaqItem {
    /// Flattens the answer to plain text, preferring content blocks over the
    /// legacy answer.
    pub fn plain_text(&self) -> String {
        if !self.content.is_empty() {
            return self
                .content
                .iter()
                .filter_map(ContentBlock::render)
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut lines: Vec<String> = self.answer.iter().cloned().collect();
        lines.extend(self.images.iter().map(|url| format!("[image]({})", url)));
        lines.join("\n")
    }

    /// True if `needle` occurs inside the question, the legacy answer, or
    /// one content fragment. Matches never span two fields.
    fn matches_search(&self, needle: &str) -> bool {
        std::iter::once(self.question.as_str())
            .chain(self.answer.as_deref())
            .chain(self.content.iter().flat_map(ContentBlock::searchable_texts))
            .any(|field| normalize_text(field).contains(needle))
    }
}

/// Search and pagination request for the FAQ browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// 1-based page number; 0 is treated as 1.
    #[serde(default)]
    pub page: usize,
    /// Items per page; 0 uses the catalog default.
    #[serde(default)]
    pub page_size: usize,
}

/// One page of FAQ results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqPage {
    pub items: Vec<FaqItem>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqCatalog {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    items: Vec<FaqItem>,
}

impl FaqCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Self = read_json_file(path)?;
        info!(
            "Loaded {} FAQ items in {} categories from {}",
            catalog.items.len(),
            catalog.categories().len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        parse_json(content, "<faq>")
    }

    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }

    /// Declared categories, or the items' categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        if !self.categories.is_empty() {
            return self.categories.clone();
        }
        let mut seen: Vec<String> = Vec::new();
        for item in &self.items {
            if !item.category.is_empty() && !seen.contains(&item.category) {
                seen.push(item.category.clone());
            }
        }
        seen
    }

    pub fn get(&self, id: &str) -> Option<&FaqItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// # Search (`search`)
    ///
    /// Filters by category and search text, then returns the requested page.
    /// `default_page_size` applies when `query.page_size` is 0.
    pub fn search(&self, query: &FaqQuery, default_page_size: usize) -> FaqPage {
        let page_size = match query.page_size {
            0 => default_page_size.max(1),
            n => n,
        };
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let needle = query
            .search
            .as_deref()
            .map(normalize_text)
            .filter(|s| !s.is_empty());

        let matching: Vec<&FaqItem> = self
            .items
            .iter()
            .filter(|item| category.map_or(true, |c| item.category == c))
            .filter(|item| needle.as_deref().map_or(true, |n| item.matches_search(n)))
            .collect();

        let total_items = matching.len();
        let total_pages = total_items.div_ceil(page_size);
        let page = query.page.clamp(1, total_pages.max(1));

        debug!(
            "FAQ search {:?}/{:?}: {} hit(s), page {}/{}",
            needle, category, total_items, page, total_pages
        );

        let items = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        FaqPage {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
