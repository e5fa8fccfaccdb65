use crate::authority::AuthorityTable;
use crate::engine::{QueryEngine, RankedResult};
use crate::error::{EngineError, EngineResult};
use crate::index::{build_from_corpus, BuildReport, IndexInfo, InvertedIndex, RawDocument};
use parking_lot::RwLock;
use std::sync::Arc;

/// Readiness wrapper around [`QueryEngine`].
///
/// Starts unindexed; every query fails with [`EngineError::NotReady`] until the
/// first index is published. Publishing swaps in a new engine whole, so a query
/// in flight keeps the snapshot it started with.
pub struct SearchService {
    authority: Arc<AuthorityTable>,
    current: RwLock<Option<Arc<QueryEngine>>>,
}

impl SearchService {
    pub fn new(authority: AuthorityTable) -> Self {
        Self { authority: Arc::new(authority), current: RwLock::new(None) }
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Build from raw pages and publish the result.
    pub fn build(&self, corpus: &[RawDocument]) -> BuildReport {
        let (index, report) = build_from_corpus(corpus);
        self.publish(index);
        report
    }

    pub fn publish(&self, index: InvertedIndex) {
        let engine = Arc::new(QueryEngine::new(index, self.authority.clone()));
        *self.current.write() = Some(engine);
    }

    /// Current snapshot.
    pub fn engine(&self) -> EngineResult<Arc<QueryEngine>> {
        self.current.read().clone().ok_or(EngineError::NotReady)
    }

    pub fn search(&self, query: &str) -> EngineResult<Vec<RankedResult>> {
        Ok(self.engine()?.search(query))
    }

    pub fn info(&self) -> EngineResult<IndexInfo> {
        Ok(self.engine()?.index().info())
    }
}
