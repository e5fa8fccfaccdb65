/// Result type for query-time operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the search service.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No index has been published yet.
    #[error("index not ready")]
    NotReady,
}

/// Reasons a single document is left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("document is empty")]
    Empty,

    #[error("document contains no markup")]
    NotMarkup,
}
