//! NLP analysis facade: one embedding call plus the deterministic
//! extractors, composed into a single [`AnalysisResult`].

use tracing::debug;
use triage_nlp::{AnalysisResult, extract_entities, extract_keywords};

use crate::errors::EngineError;
use crate::providers::EmbeddingsProvider;

/// Composes the embedding provider with keyword and entity extraction.
///
/// Keyword/entity extraction is pure and always runs on the same raw text
/// that was embedded. If the embedding call fails the whole analysis fails;
/// there is no partial result, since callers treat the embedding as the
/// primary output.
pub struct NlpAnalyzer<E: EmbeddingsProvider> {
    embedder: E,
}

impl<E: EmbeddingsProvider> NlpAnalyzer<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// Analyzes one bug description.
    ///
    /// # Errors
    /// Returns [`EngineError::Embedding`] if the embedding call fails.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        let embedding = self.embedder.embed(text).await?;
        let result = AnalysisResult {
            embedding,
            entities: extract_entities(text),
            keywords: extract_keywords(text),
        };
        debug!(
            dim = result.embedding.len(),
            entities = result.entities.len(),
            keywords = result.keywords.len(),
            "analysis completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeEmbedder {
        fail: bool,
    }

    impl EmbeddingsProvider for FakeEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EngineError> {
            if self.fail {
                Err(EngineError::Embedding("provider offline".into()))
            } else {
                Ok(vec![0.25; 384])
            }
        }
    }

    #[tokio::test]
    async fn composes_embedding_keywords_and_entities() {
        let analyzer = NlpAnalyzer::new(FakeEmbedder { fail: false });
        let res = analyzer
            .analyze("Database error 500 when loading the payment checkout page")
            .await
            .unwrap();

        assert_eq!(res.embedding.len(), 384);
        assert!(res.entities.iter().any(|e| e.text == "Database"));
        assert!(res.entities.iter().any(|e| e.text == "500"));
        assert!(res.keywords.iter().any(|k| k.contains("checkout")));
    }

    #[tokio::test]
    async fn embedding_failure_fails_the_whole_call() {
        let analyzer = NlpAnalyzer::new(FakeEmbedder { fail: true });
        let err = analyzer.analyze("any text").await.unwrap_err();
        assert!(matches!(err, EngineError::Embedding(_)));
    }
}
