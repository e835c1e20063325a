//! # Dynamic Response Variables
//!
//! File: cli/src/engine/placeholders.rs
//!
//! Canned responses may contain `{today}`, `{date}` and `{deadline}`. They
//! are filled in after matching, using the date extracted from the same
//! question. Placeholders that cannot be resolved are left as written.
//!
use super::dates::{format_korean_date, vat_deadline, ExtractedDate};
use chrono::NaiveDate;

/// Replaces every `{today}`, and, when a date was extracted, every `{date}`
/// and `{deadline}` in `text`.
pub fn replace_dynamic_variables(
    text: &str,
    extracted: Option<&ExtractedDate>,
    today: NaiveDate,
) -> String {
    let mut result = text.replace("{today}", &format_korean_date(today));

    if let Some(date) = extracted {
        result = result.replace("{date}", &date.full_date);
        if let Some(deadline) = vat_deadline(date) {
            result = result.replace("{deadline}", &format_korean_date(deadline));
        }
    }

    result
}
