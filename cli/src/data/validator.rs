//! # Knowledge File Validator
//!
//! File: cli/src/data/validator.rs
//!
//! ## Overview
//!
//! Content editors maintain the unified knowledge file by hand. Before a file
//! is shipped it is checked in five passes:
//!
//! 1. Structure: `metadata` and `items` exist, `items` is an array
//! 2. Items: required fields, `type`, `priority` range, keywords, responses
//! 3. Duplicates: ids (error) and titles (warning)
//! 4. Synonyms: optional object of arrays
//! 5. Statistics: distributions and averages for the report
//!
//! Errors make the file invalid. Warnings are reported but never fail the
//! check; strict mode only adds more of them.
//!
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "type",
    "category",
    "title",
    "keywords",
    "priority",
    "responses",
];
const ITEM_TYPES: [&str; 3] = ["intent", "knowledge", "case"];
const MIN_STRICT_KEYWORDS: usize = 2;
const MIN_STRICT_RESPONSE_CHARS: usize = 20;
const MAX_RESPONSE_CHARS: usize = 2000;

/// Average response length per tone, in characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseLengths {
    pub formal: f64,
    pub casual: f64,
    pub plain: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KnowledgeStats {
    pub total_items: usize,
    pub total_synonyms: usize,
    /// Type counts in first-seen order.
    pub type_distribution: IndexMap<String, usize>,
    /// Category counts, most common first.
    pub category_distribution: IndexMap<String, usize>,
    pub priority_distribution: BTreeMap<i64, usize>,
    pub avg_keywords_per_item: f64,
    pub avg_response_length: ResponseLengths,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: KnowledgeStats,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct KnowledgeValidator {
    strict: bool,
}

impl KnowledgeValidator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Runs every pass over a parsed knowledge file.
    pub fn validate(&self, data: &Value) -> ValidationReport {
        let mut report = ValidationReport::default();
        let empty = Vec::new();
        let items = data.get("items").and_then(Value::as_array).unwrap_or(&empty);

        self.check_structure(data, &mut report);
        self.check_items(items, &mut report);
        self.check_duplicates(items, &mut report);
        self.check_synonyms(data, &mut report);
        report.stats = collect_stats(data, items);

        info!(
            "Validated {} item(s): {} error(s), {} warning(s)",
            items.len(),
            report.errors.len(),
            report.warnings.len()
        );
        report
    }

    fn check_structure(&self, data: &Value, report: &mut ValidationReport) {
        for key in ["metadata", "items"] {
            if data.get(key).is_none() {
                report
                    .errors
                    .push(format!("Required top-level key '{}' is missing.", key));
            }
        }
        if let Some(items) = data.get("items") {
            if !items.is_array() {
                report.errors.push("'items' must be an array.".to_string());
            }
        }
    }

    fn check_items(&self, items: &[Value], report: &mut ValidationReport) {
        for (idx, item) in items.iter().enumerate() {
            let Some(fields) = item.as_object() else {
                report
                    .errors
                    .push(format!("[UNKNOWN_{}] item must be an object.", idx));
                continue;
            };
            let item_id = fields
                .get("id")
                .map(display_value)
                .unwrap_or_else(|| format!("UNKNOWN_{}", idx));
            debug!("Checking item {}", item_id);

            for field in REQUIRED_FIELDS {
                if !fields.contains_key(field) {
                    report
                        .errors
                        .push(format!("[{}] required field '{}' is missing.", item_id, field));
                }
            }

            if let Some(kind) = fields.get("type") {
                if !kind.as_str().is_some_and(|k| ITEM_TYPES.contains(&k)) {
                    report.errors.push(format!(
                        "[{}] type must be one of 'intent', 'knowledge', 'case': {}",
                        item_id,
                        display_value(kind)
                    ));
                }
            }

            if let Some(priority) = fields.get("priority") {
                let in_range = priority.as_i64().is_some_and(|p| (1..=10).contains(&p));
                if !in_range {
                    report.errors.push(format!(
                        "[{}] priority must be an integer between 1 and 10: {}",
                        item_id,
                        display_value(priority)
                    ));
                }
            }

            if let Some(keywords) = fields.get("keywords") {
                self.check_keywords(&item_id, keywords, report);
            }

            if let Some(responses) = fields.get("responses") {
                self.check_responses(&item_id, responses, report);
            }
        }
    }

    fn check_keywords(&self, item_id: &str, keywords: &Value, report: &mut ValidationReport) {
        match keywords.as_array() {
            None => report
                .errors
                .push(format!("[{}] keywords must be an array.", item_id)),
            Some(list) if self.strict && list.len() < MIN_STRICT_KEYWORDS => {
                report.warnings.push(format!(
                    "[{}] fewer than {} keywords: {}",
                    item_id,
                    MIN_STRICT_KEYWORDS,
                    list.len()
                ))
            }
            Some(list) if list.is_empty() => report
                .warnings
                .push(format!("[{}] keywords are empty.", item_id)),
            Some(_) => {}
        }
    }

    fn check_responses(&self, item_id: &str, responses: &Value, report: &mut ValidationReport) {
        let Some(by_tone) = responses.as_object() else {
            report
                .errors
                .push(format!("[{}] responses must be an object.", item_id));
            return;
        };
        if by_tone.is_empty() {
            report
                .errors
                .push(format!("[{}] responses are empty.", item_id));
        }
        for (tone, text) in by_tone {
            let Some(text) = text.as_str() else {
                report
                    .errors
                    .push(format!("[{}] {} response must be a string.", item_id, tone));
                continue;
            };
            let chars = text.chars().count();
            if self.strict && chars < MIN_STRICT_RESPONSE_CHARS {
                report.warnings.push(format!(
                    "[{}] {} response is too short ({} chars)",
                    item_id, tone, chars
                ));
            } else if chars > MAX_RESPONSE_CHARS {
                report.warnings.push(format!(
                    "[{}] {} response is too long ({} chars)",
                    item_id, tone, chars
                ));
            }
        }
    }

    fn check_duplicates(&self, items: &[Value], report: &mut ValidationReport) {
        let ids = count_in_order(items.iter().filter_map(|item| item.get("id").map(display_value)));
        let duplicate_ids: Vec<String> = ids
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect();
        if !duplicate_ids.is_empty() {
            report
                .errors
                .push(format!("Duplicate ids found: {}", duplicate_ids.join(", ")));
        }

        let titles =
            count_in_order(items.iter().filter_map(|item| item.get("title").map(display_value)));
        let duplicate_titles = titles.values().filter(|count| **count > 1).count();
        if duplicate_titles > 0 {
            report
                .warnings
                .push(format!("Duplicate titles found: {}", duplicate_titles));
        }
    }

    fn check_synonyms(&self, data: &Value, report: &mut ValidationReport) {
        let Some(synonyms) = data.get("synonyms") else {
            info!("No synonym dictionary present.");
            return;
        };
        let Some(groups) = synonyms.as_object() else {
            report
                .errors
                .push("synonyms must be an object.".to_string());
            return;
        };
        for (word, variants) in groups {
            match variants.as_array() {
                None => report
                    .errors
                    .push(format!("Synonym entry '{}' must be an array.", word)),
                Some(list) if list.is_empty() => report
                    .warnings
                    .push(format!("Synonym entry '{}' has no variants.", word)),
                Some(_) => {}
            }
        }
    }
}

fn collect_stats(data: &Value, items: &[Value]) -> KnowledgeStats {
    let total_items = items.len();
    let field_of = |item: &Value, key: &str| item.get(key).map(display_value).unwrap_or_default();

    let mut category_distribution = count_in_order(items.iter().map(|i| field_of(i, "category")));
    category_distribution.sort_by(|_, a, _, b| b.cmp(a));

    let mut priority_distribution = BTreeMap::new();
    for priority in items.iter().filter_map(|i| i.get("priority").and_then(Value::as_i64)) {
        *priority_distribution.entry(priority).or_insert(0) += 1;
    }

    let average = |sum: usize| {
        if total_items == 0 {
            0.0
        } else {
            sum as f64 / total_items as f64
        }
    };
    let keyword_total: usize = items
        .iter()
        .filter_map(|i| i.get("keywords").and_then(Value::as_array))
        .map(Vec::len)
        .sum();
    let response_total = |tone: &str| -> usize {
        items
            .iter()
            .filter_map(|i| i.get("responses").and_then(Value::as_object))
            .filter_map(|r: &Map<String, Value>| r.get(tone).and_then(Value::as_str))
            .map(|text| text.chars().count())
            .sum()
    };

    KnowledgeStats {
        total_items,
        total_synonyms: data
            .get("synonyms")
            .and_then(Value::as_object)
            .map_or(0, Map::len),
        type_distribution: count_in_order(items.iter().map(|i| field_of(i, "type"))),
        category_distribution,
        priority_distribution,
        avg_keywords_per_item: average(keyword_total),
        avg_response_length: ResponseLengths {
            formal: average(response_total("formal")),
            casual: average(response_total("casual")),
            plain: average(response_total("plain")),
        },
    }
}

/// Counts occurrences, keeping keys in first-seen order.
fn count_in_order(values: impl Iterator<Item = String>) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Strings without quotes, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
