use crate::error::ExtractError;
use crate::extract::extract;
use crate::stemmer::stem;
use crate::tokenizer::tokenize;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use time::format_description::well_known::Rfc3339;

/// Dense internal id, the position of the document in build order.
pub type DocId = u32;

/// Number of index keys reported in [`IndexInfo::sample_words`].
const SAMPLE_WORDS: usize = 20;

/// An extracted page. `id` is the stable external key (the file name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub description: String,
    pub body: String,
}

/// Unparsed input handed to the builder by whoever enumerates the corpus.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub markup: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub indexed: usize,
    pub skipped: Vec<SkippedDocument>,
}

/// Summary of a built index, for debugging and the index-info endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub total_pages: usize,
    pub total_words: usize,
    pub pages: Vec<String>,
    pub sample_words: Vec<String>,
    pub built_at: String,
}

/// Term-or-stem -> set of documents. Immutable once built.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<DocId>>,
    docs: Vec<Document>,
    built_at: String,
}

impl InvertedIndex {
    pub fn postings(&self, key: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(key)
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }

    pub fn docs(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.docs.iter().enumerate().map(|(i, d)| (i as DocId, d))
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Key -> external document ids. Independent of build order, so two builds
    /// of the same corpus compare equal.
    pub fn to_id_map(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.postings
            .iter()
            .map(|(key, ids)| {
                let ext = ids
                    .iter()
                    .filter_map(|&d| self.doc(d))
                    .map(|d| d.id.clone())
                    .collect();
                (key.clone(), ext)
            })
            .collect()
    }

    pub fn info(&self) -> IndexInfo {
        let mut pages: Vec<String> = self.docs.iter().map(|d| d.id.clone()).collect();
        pages.sort();
        let mut words: Vec<&String> = self.postings.keys().collect();
        words.sort();
        IndexInfo {
            total_pages: self.docs.len(),
            total_words: self.postings.len(),
            pages,
            sample_words: words.into_iter().take(SAMPLE_WORDS).cloned().collect(),
            built_at: self.built_at.clone(),
        }
    }
}

/// Build the index from already extracted documents.
///
/// Every token of `title + description + body` is posted under itself and,
/// when different, under its stem. Documents repeating an earlier id are dropped.
pub fn build_index(documents: Vec<Document>) -> InvertedIndex {
    build_documents(documents).0
}

/// Extract every page (in parallel when the `parallel` feature is on), skip the
/// ones that fail, and build the index from the rest.
pub fn build_from_corpus(corpus: &[RawDocument]) -> (InvertedIndex, BuildReport) {
    tracing::info!(documents = corpus.len(), "starting index build");

    #[cfg(feature = "parallel")]
    let extracted: Vec<(&RawDocument, Result<Document, ExtractError>)> = corpus
        .par_iter()
        .map(|raw| (raw, extract(&raw.id, &raw.markup)))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let extracted: Vec<(&RawDocument, Result<Document, ExtractError>)> = corpus
        .iter()
        .map(|raw| (raw, extract(&raw.id, &raw.markup)))
        .collect();

    let mut documents = Vec::with_capacity(extracted.len());
    let mut skipped = Vec::new();
    for (raw, result) in extracted {
        match result {
            Ok(doc) => {
                tracing::debug!(id = %doc.id, title = %doc.title, "extracted");
                documents.push(doc);
            }
            Err(e) => {
                tracing::warn!(id = %raw.id, error = %e, "skipping document");
                skipped.push(SkippedDocument { id: raw.id.clone(), reason: e.to_string() });
            }
        }
    }

    let (index, duplicates) = build_documents(documents);
    skipped.extend(duplicates);
    let report = BuildReport { indexed: index.num_docs(), skipped };
    tracing::info!(
        num_docs = report.indexed,
        num_terms = index.num_terms(),
        skipped = report.skipped.len(),
        "index build complete"
    );
    (index, report)
}

fn build_documents(documents: Vec<Document>) -> (InvertedIndex, Vec<SkippedDocument>) {
    let mut postings: HashMap<String, BTreeSet<DocId>> = HashMap::new();
    let mut docs: Vec<Document> = Vec::with_capacity(documents.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = Vec::new();

    for doc in documents {
        if !seen.insert(doc.id.clone()) {
            tracing::warn!(id = %doc.id, "skipping duplicate document id");
            skipped.push(SkippedDocument { id: doc.id, reason: "duplicate document id".into() });
            continue;
        }
        let doc_id = docs.len() as DocId;
        let text = format!("{} {} {}", doc.title, doc.description, doc.body);
        for token in tokenize(&text) {
            let root = stem(&token);
            if root != token {
                postings.entry(root).or_default().insert(doc_id);
            }
            postings.entry(token).or_default().insert(doc_id);
        }
        docs.push(doc);
    }

    let built_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
    (InvertedIndex { postings, docs, built_at }, skipped)
}
