//! Unified error type for the triage engine.

use thiserror::Error;

/// Top-level error for triage-engine operations.
///
/// The duplicate workflow converts `Search` and `Embedding` failures into
/// an empty result (fail-open); `analyze` propagates `Embedding` to the
/// caller; `Explanation` is isolated per candidate and never escalates.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The embedding capability could not be reached or failed.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The similarity-search capability failed.
    #[error("search error: {0}")]
    Search(String),

    /// A per-candidate reasoning call failed.
    #[error("explanation error: {0}")]
    Explanation(String),

    /// The structured-prediction call failed or returned no usable JSON.
    #[error("prediction error: {0}")]
    Prediction(String),

    /// JSON (de)serialization error.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Mismatch between an embedding and the configured vector space.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}
