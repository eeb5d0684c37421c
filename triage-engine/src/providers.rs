//! Trait seams for the external capabilities the workflows depend on.
//!
//! The workflows are generic over these traits, so production wiring uses
//! the shared [`LlmServiceProfiles`] and the Qdrant facade, while tests plug
//! in deterministic fakes. `Arc` blanket impls let one shared instance back
//! several seams at once.

use std::sync::Arc;

use llm_service::LlmServiceProfiles;
use tracing::debug;

use crate::errors::EngineError;
use crate::record::BugHit;

/// Produces a fixed-dimension, L2-normalized vector for a text.
///
/// Must be deterministic for identical text (same model/version).
pub trait EmbeddingsProvider: Send + Sync {
    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<f32>, EngineError>> + Send;
}

/// Vector nearest-neighbor search over stored bug reports.
///
/// Hits come back sorted by similarity descending; similarity is cosine in
/// [0, 1]; candidates below `threshold` are filtered server-side.
pub trait SimilaritySearch: Send + Sync {
    fn search(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        limit: u64,
        project_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<BugHit>, EngineError>> + Send;
}

/// One-sentence "why are these duplicates" rationale for two descriptions.
///
/// The response is accepted as-is; callers must tolerate arbitrary length.
pub trait Explainer: Send + Sync {
    fn explain(
        &self,
        new_description: &str,
        existing_description: &str,
    ) -> impl Future<Output = Result<String, EngineError>> + Send;
}

impl<T: EmbeddingsProvider> EmbeddingsProvider for Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        (**self).embed(text).await
    }
}

impl<T: SimilaritySearch> SimilaritySearch for Arc<T> {
    async fn search(
        &self,
        vector: Vec<f32>,
        threshold: f32,
        limit: u64,
        project_id: Option<&str>,
    ) -> Result<Vec<BugHit>, EngineError> {
        (**self).search(vector, threshold, limit, project_id).await
    }
}

impl<T: Explainer> Explainer for Arc<T> {
    async fn explain(
        &self,
        new_description: &str,
        existing_description: &str,
    ) -> Result<String, EngineError> {
        (**self).explain(new_description, existing_description).await
    }
}

impl EmbeddingsProvider for LlmServiceProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        self.embed(text)
            .await
            .map_err(|e| EngineError::Embedding(e.to_string()))
    }
}

const EXPLAIN_SYSTEM: &str = "You compare bug reports for a tracker. Answer with one plain \
                              sentence of 25 words or fewer. No markdown, no preamble.";

impl Explainer for LlmServiceProfiles {
    async fn explain(
        &self,
        new_description: &str,
        existing_description: &str,
    ) -> Result<String, EngineError> {
        let prompt = format!(
            "A new bug report:\n{new_description}\n\nAn existing bug report:\n\
             {existing_description}\n\nIn one sentence, explain why these two reports likely \
             describe the same underlying bug."
        );
        debug!(prompt_len = prompt.len(), "requesting duplicate rationale");
        let text = self
            .generate_fast(&prompt, Some(EXPLAIN_SYSTEM))
            .await
            .map_err(|e| EngineError::Explanation(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}
