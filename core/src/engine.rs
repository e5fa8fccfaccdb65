use crate::authority::AuthorityTable;
use crate::index::{DocId, InvertedIndex};
use crate::scoring::{score, ScoreBreakdown};
use crate::stemmer::variations;
use crate::tokenizer::normalize;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

/// One ranked hit, in the shape the HTTP layer serializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub total_score: u64,
    pub breakdown: ScoreBreakdown,
    pub matched_variations: Vec<String>,
}

/// Answers queries against one immutable index.
#[derive(Debug)]
pub struct QueryEngine {
    index: InvertedIndex,
    authority: Arc<AuthorityTable>,
}

impl QueryEngine {
    pub fn new(index: InvertedIndex, authority: Arc<AuthorityTable>) -> Self {
        Self { index, authority }
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn authority(&self) -> &AuthorityTable {
        &self.authority
    }

    /// Rank every document sharing at least one variation with the query.
    ///
    /// A query that normalizes to nothing yields no results.
    pub fn search(&self, query: &str) -> Vec<RankedResult> {
        let term = normalize(query);
        if term.is_empty() {
            return Vec::new();
        }
        let variations = query_variations(&term);

        let mut candidates: BTreeSet<DocId> = BTreeSet::new();
        for v in &variations {
            if let Some(postings) = self.index.postings(v) {
                candidates.extend(postings.iter().copied());
            }
        }

        let mut results: Vec<RankedResult> = candidates
            .into_iter()
            .filter_map(|doc_id| self.index.doc(doc_id))
            .map(|doc| {
                let s = score(doc, &variations, self.authority.weight(&doc.id));
                RankedResult {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    description: doc.description.clone(),
                    total_score: s.total_score,
                    breakdown: s.breakdown,
                    matched_variations: s.matched_variations,
                }
            })
            .collect();
        results.sort_by(rank_order);

        tracing::debug!(%term, ?variations, hits = results.len(), "search");
        results
    }
}

/// Union of the variation sets of every word in an already normalized query.
pub fn query_variations(term: &str) -> BTreeSet<String> {
    term.split_whitespace().flat_map(variations).collect()
}

/// Highest total first; equal totals fall back to ascending document id.
fn rank_order(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.total_score.cmp(&a.total_score).then_with(|| a.id.cmp(&b.id))
}
