//! Multi-factor relevance scoring.
//!
//! A document's score for a query is the sum of four independent components:
//!
//! | Component   | Value                                                        |
//! |-------------|--------------------------------------------------------------|
//! | title       | [`TITLE_SCORE`] if any variation occurs in the title         |
//! | description | [`DESCRIPTION_SCORE`] if any variation occurs in the meta description |
//! | frequency   | occurrences of every variation in the body, summed           |
//! | backlink    | the document's authority weight                              |
//!
//! Matching is literal substring matching on lowercased text. Variations are
//! counted independently, so with both `run` and `running` in the set a body
//! containing `running` scores 2: frequency is an upper bound, not a word count.

use crate::Document;
use serde::Serialize;
use std::collections::BTreeSet;

/// Flat bonus when any variation appears in the title.
pub const TITLE_SCORE: u32 = 15;

/// Flat bonus when any variation appears in the meta description.
pub const DESCRIPTION_SCORE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub title_score: u32,
    pub description_score: u32,
    pub frequency_score: u32,
    pub backlink_score: u32,
}

impl ScoreBreakdown {
    /// Widened so that no combination of components can overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.title_score)
            + u64::from(self.description_score)
            + u64::from(self.frequency_score)
            + u64::from(self.backlink_score)
    }
}

/// Score of one document for one query, with the variations that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentScore {
    pub total_score: u64,
    pub breakdown: ScoreBreakdown,
    pub matched_variations: Vec<String>,
}

pub fn score(doc: &Document, variations: &BTreeSet<String>, authority: u32) -> DocumentScore {
    let title = doc.title.to_lowercase();
    let description = doc.description.to_lowercase();
    let body = doc.body.to_lowercase();

    let mut breakdown = ScoreBreakdown { backlink_score: authority, ..Default::default() };
    let mut matched_variations = Vec::new();

    for v in variations.iter().filter(|v| !v.is_empty()) {
        let in_title = title.contains(v.as_str());
        let in_description = description.contains(v.as_str());
        let in_body = count_occurrences(&body, v);

        if in_title {
            breakdown.title_score = TITLE_SCORE;
        }
        if in_description {
            breakdown.description_score = DESCRIPTION_SCORE;
        }
        breakdown.frequency_score = breakdown.frequency_score.saturating_add(in_body);
        if in_title || in_description || in_body > 0 {
            matched_variations.push(v.clone());
        }
    }

    DocumentScore { total_score: breakdown.total(), breakdown, matched_variations }
}

/// Non-overlapping literal occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    u32::try_from(haystack.matches(needle).count()).unwrap_or(u32::MAX)
}
