//! Engine configuration: vector-store connectivity and duplicate-search
//! knobs, built directly or read from environment variables.

use crate::errors::EngineError;

/// Configuration for the triage engine's vector-store side.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection holding bug-report vectors.
    pub collection: String,
    /// Embedding dimensionality (matches the embedding model).
    pub vector_dim: usize,
    /// Minimum cosine similarity for a duplicate candidate.
    pub similarity_threshold: f32,
    /// Maximum number of candidates returned per check.
    pub max_candidates: u64,
    /// Fan-out bound for per-candidate reasoning calls.
    pub explain_concurrency: usize,
}

impl EngineConfig {
    /// Sane defaults for a given endpoint and collection: 384-dim vectors,
    /// threshold 0.82, at most 3 candidates.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            vector_dim: 384,
            similarity_threshold: 0.82,
            max_candidates: 3,
            explain_concurrency: 3,
        }
    }

    /// Reads the config from the environment.
    ///
    /// - `QDRANT_URL` (required)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default `bug_reports`)
    /// - `EMBEDDING_DIM` (default 384)
    /// - `DUP_THRESHOLD` (default 0.82)
    /// - `DUP_LIMIT` (default 3)
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] for missing/unparseable values.
    pub fn from_env() -> Result<Self, EngineError> {
        let qdrant_url = std::env::var("QDRANT_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| EngineError::Config("QDRANT_URL is not set".into()))?;

        let collection = std::env::var("QDRANT_COLLECTION")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "bug_reports".to_string());

        let mut cfg = Self::new_default(qdrant_url, collection);
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());

        if let Some(dim) = parse_env::<usize>("EMBEDDING_DIM")? {
            cfg.vector_dim = dim;
        }
        if let Some(t) = parse_env::<f32>("DUP_THRESHOLD")? {
            cfg.similarity_threshold = t;
        }
        if let Some(limit) = parse_env::<u64>("DUP_LIMIT")? {
            cfg.max_candidates = limit;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(EngineError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(EngineError::Config("collection is empty".into()));
        }
        if self.vector_dim == 0 {
            return Err(EngineError::Config("vector_dim must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(EngineError::Config(
                "similarity_threshold must be in [0, 1]".into(),
            ));
        }
        if self.max_candidates == 0 {
            return Err(EngineError::Config("max_candidates must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, EngineError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("failed to parse {key} = '{v}'"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::new_default("http://localhost:6334", "bug_reports");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.vector_dim, 384);
        assert_eq!(cfg.similarity_threshold, 0.82);
        assert_eq!(cfg.max_candidates, 3);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut cfg = EngineConfig::new_default("http://localhost:6334", "bug_reports");
        cfg.similarity_threshold = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_collection() {
        let cfg = EngineConfig::new_default("http://localhost:6334", "");
        assert!(cfg.validate().is_err());
    }
}
