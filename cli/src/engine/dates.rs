//! # Date Extraction & VAT Deadlines
//!
//! File: cli/src/engine/dates.rs
//!
//! ## Overview
//!
//! Questions such as "11월 20일 거래분은 언제까지 신고해야 하나요?" carry a
//! transaction date. This module pulls that date out of free text and derives
//! the VAT (부가가치세) filing deadline for it.
//!
//! ## Patterns
//!
//! Patterns are tried in a fixed order and the first one that yields a date
//! wins:
//!
//! | # | Example          | Year            | Notes                          |
//! |---|------------------|-----------------|--------------------------------|
//! | 1 | `2025년 11월 20일` | as written      |                                |
//! | 2 | `11월 20일`        | current year    |                                |
//! | 3 | `2025-11-20`, `2025/11/20` | as written |                          |
//! | 4 | `11.20`           | current year    | month 1–12, day 1–31 only      |
//! | 5 | `11월 거래`         | current year    | month 1–12 only, day = 1       |
//!
//! ## Deadline rule
//!
//! - transactions in January–June are filed by **July 25** of the same year
//! - transactions in July–December are filed by **January 25** of the next year
//!
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

static FULL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})년\s*([0-9]{1,2})월\s*([0-9]{1,2})일").unwrap());
static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})월\s*([0-9]{1,2})일").unwrap());
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})").unwrap());
static DOT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})").unwrap());
static MONTH_TRANSACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})월\s*거래").unwrap());

/// A date found in a user's question, with display forms prepared for
/// template substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDate {
    /// `2025년 11월 20일`, digits as the user wrote them.
    pub full_date: String,
    /// `11월 20일`
    pub month_day: String,
    /// `2025-11-20`, month and day zero-padded.
    pub iso_date: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ExtractedDate {
    fn from_parts(year: &str, month: &str, day: &str) -> Option<Self> {
        Some(Self {
            full_date: format!("{}년 {}월 {}일", year, month, day),
            month_day: format!("{}월 {}일", month, day),
            iso_date: format!("{}-{:0>2}-{:0>2}", year, month, day),
            year: year.parse().ok()?,
            month: month.parse().ok()?,
            day: day.parse().ok()?,
        })
    }

    fn month_only(year: i32, month: &str) -> Option<Self> {
        Some(Self {
            full_date: format!("{}년 {}월", year, month),
            month_day: format!("{}월", month),
            iso_date: format!("{}-{:0>2}-01", year, month),
            year,
            month: month.parse().ok()?,
            day: 1,
        })
    }
}

fn group<'h>(caps: &Captures<'h>, index: usize) -> &'h str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// # Extract Date (`extract_date`)
///
/// Returns the first date found in `query`, trying the patterns in order.
/// `today` supplies the year for patterns that omit it.
pub fn extract_date(query: &str, today: NaiveDate) -> Option<ExtractedDate> {
    let current_year = today.year().to_string();

    if let Some(caps) = FULL_DATE.captures(query) {
        return ExtractedDate::from_parts(group(&caps, 1), group(&caps, 2), group(&caps, 3));
    }

    if let Some(caps) = MONTH_DAY.captures(query) {
        return ExtractedDate::from_parts(&current_year, group(&caps, 1), group(&caps, 2));
    }

    if let Some(caps) = ISO_DATE.captures(query) {
        return ExtractedDate::from_parts(group(&caps, 1), group(&caps, 2), group(&caps, 3));
    }

    if let Some(caps) = DOT_DATE.captures(query) {
        let (month, day) = (group(&caps, 1), group(&caps, 2));
        let in_range = month.parse::<u32>().is_ok_and(|m| (1..=12).contains(&m))
            && day.parse::<u32>().is_ok_and(|d| (1..=31).contains(&d));
        if in_range {
            return ExtractedDate::from_parts(&current_year, month, day);
        }
    }

    if let Some(caps) = MONTH_TRANSACTION.captures(query) {
        let month = group(&caps, 1);
        if month.parse::<u32>().is_ok_and(|m| (1..=12).contains(&m)) {
            return ExtractedDate::month_only(today.year(), month);
        }
    }

    None
}

/// # VAT Deadline (`vat_deadline`)
///
/// First-half transactions (months 1–6) are due July 25 of the same year;
/// second-half transactions (months 7–12) are due January 25 of the next
/// year. Out-of-range months and year 0 have no deadline.
pub fn vat_deadline(date: &ExtractedDate) -> Option<NaiveDate> {
    if date.year == 0 {
        return None;
    }
    match date.month {
        1..=6 => NaiveDate::from_ymd_opt(date.year, 7, 25),
        7..=12 => NaiveDate::from_ymd_opt(date.year + 1, 1, 25),
        _ => None,
    }
}

/// Formats a date as `2025년 7월 25일` (no zero padding).
pub fn format_korean_date(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}
