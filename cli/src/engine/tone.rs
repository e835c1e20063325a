//! # Response Tone
//!
//! File: cli/src/engine/tone.rs
//!
//! Every canned answer exists in two registers: formal (존댓말) and casual
//! (반말). The tone is either chosen explicitly (CLI flag, config, API field)
//! or guessed from the wording of the user's message with `detect_tone`.
//!
use crate::core::error::SupportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Register of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Casual,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = SupportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "formal" | "polite" => Ok(Tone::Formal),
            "casual" => Ok(Tone::Casual),
            other => Err(SupportError::UnknownTone(other.to_string())),
        }
    }
}

const CASUAL_MARKERS: [&str; 7] = ["해", "야", "어", "음", "ㅋ", "ㅎ", "요 없이"];
const FORMAL_MARKERS: [&str; 4] = ["습니다", "십시오", "세요", "요"];

/// # Detect Tone (`detect_tone`)
///
/// Guesses the register of `query` from sentence-ending markers.
/// Only casual markers present yields `Casual`; only formal markers yields
/// `Formal`. Both or neither is ambiguous and falls back to `Formal`.
pub fn detect_tone(query: &str) -> Tone {
    let has_casual = CASUAL_MARKERS.iter().any(|marker| query.contains(marker));
    let has_formal = FORMAL_MARKERS.iter().any(|marker| query.contains(marker));

    match (has_casual, has_formal) {
        (true, false) => Tone::Casual,
        _ => Tone::Formal,
    }
}
