//! Indexing and ranking engine for a small corpus of HTML pages.
//!
//! Pages are extracted into title / description / body, tokenized, stemmed and
//! posted into an in-memory inverted index. Queries are expanded into every
//! known surface form of their stem and ranked by title, description, body
//! frequency and a static authority weight.

pub mod authority;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod scoring;
pub mod service;
pub mod stemmer;
pub mod tokenizer;

pub use authority::AuthorityTable;
pub use engine::{QueryEngine, RankedResult};
pub use error::{EngineError, EngineResult, ExtractError};
pub use index::{build_from_corpus, build_index, BuildReport, DocId, Document, IndexInfo, InvertedIndex, RawDocument};
pub use scoring::{DocumentScore, ScoreBreakdown};
pub use service::SearchService;
