//! Bug-triage orchestration over the NLP core, the shared LLM service, and
//! a Qdrant vector store.
//!
//! This crate wires three workflows:
//! - `analyze`: embedding + keywords + entities for one description
//! - `find_duplicates`: vector search plus best-effort LLM reasoning,
//!   fail-open (advisory feature — never an error to the submitter)
//! - `predict_triage`: strict-JSON category/severity suggestion
//!
//! All external capabilities sit behind trait seams ([`EmbeddingsProvider`],
//! [`SimilaritySearch`], [`Explainer`]) so the workflows are testable with
//! in-memory fakes. [`TriageEngine`] is the production wiring and the
//! single entry point recommended for application code.

mod analyze;
mod config;
mod duplicate;
mod errors;
mod predict;
mod providers;
mod qdrant_facade;
mod record;

pub use analyze::NlpAnalyzer;
pub use config::EngineConfig;
pub use duplicate::DuplicateDetector;
pub use errors::EngineError;
pub use predict::{TriagePrediction, parse_prediction};
pub use providers::{EmbeddingsProvider, Explainer, SimilaritySearch};
pub use qdrant_facade::QdrantFacade;
pub use record::{BugHit, BugRecord, DuplicateCandidate};

use std::sync::Arc;

use llm_service::LlmServiceProfiles;
use tracing::trace;
use triage_nlp::{AnalysisResult, SolutionResult};

/// Production wiring of the triage workflows.
///
/// Construct once per process and share by reference; the engine holds the
/// LLM profiles and the Qdrant facade behind `Arc`, and every invocation is
/// otherwise stateless.
pub struct TriageEngine {
    cfg: EngineConfig,
    llm: Arc<LlmServiceProfiles>,
    store: Arc<QdrantFacade>,
    analyzer: NlpAnalyzer<Arc<LlmServiceProfiles>>,
    detector:
        DuplicateDetector<Arc<LlmServiceProfiles>, Arc<QdrantFacade>, Arc<LlmServiceProfiles>>,
}

impl TriageEngine {
    /// Builds the engine from a config and shared LLM profiles.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`]/[`EngineError::Qdrant`] if the
    /// config is invalid or the Qdrant client cannot be built.
    pub fn new(cfg: EngineConfig, llm: Arc<LlmServiceProfiles>) -> Result<Self, EngineError> {
        trace!(collection = %cfg.collection, "TriageEngine::new");
        let store = Arc::new(QdrantFacade::new(&cfg)?);
        let analyzer = NlpAnalyzer::new(llm.clone());
        let detector = DuplicateDetector::new(
            llm.clone(),
            store.clone(),
            llm.clone(),
            cfg.similarity_threshold,
            cfg.max_candidates,
            cfg.explain_concurrency,
        );
        Ok(Self {
            cfg,
            llm,
            store,
            analyzer,
            detector,
        })
    }

    /// Creates the backing collection if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`EngineError::Qdrant`] on client failures.
    pub async fn ensure_collection(&self) -> Result<(), EngineError> {
        self.store.ensure_collection().await
    }

    /// Embeds and stores one bug report so later duplicate checks can find
    /// it.
    ///
    /// # Errors
    /// Embedding failures, dimension mismatches, or Qdrant failures.
    pub async fn index_bug(&self, record: &BugRecord) -> Result<(), EngineError> {
        let embedding = EmbeddingsProvider::embed(&self.llm, &record.description).await?;
        self.store.upsert_bug(record, embedding).await
    }

    /// Full NLP analysis of one description.
    ///
    /// # Errors
    /// Returns [`EngineError::Embedding`] if the embedding call fails; the
    /// deterministic extractors cannot fail.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        self.analyzer.analyze(text).await
    }

    /// Rule-based canned solution for one description. Pure and
    /// deterministic; see `triage_nlp::solve`.
    pub fn solve(&self, text: &str) -> SolutionResult {
        triage_nlp::solve(text)
    }

    /// Ranked duplicate candidates for a new description (fail-open; an
    /// empty list is "no duplicate warning").
    pub async fn find_duplicates(
        &self,
        description: &str,
        project_id: Option<&str>,
    ) -> Vec<DuplicateCandidate> {
        self.detector.find_duplicates(description, project_id).await
    }

    /// Model-suggested category/severity for a new report.
    ///
    /// # Errors
    /// Generation failures map to [`EngineError::Prediction`]; malformed
    /// output fails closed via [`parse_prediction`].
    pub async fn predict_triage(
        &self,
        title: &str,
        description: &str,
    ) -> Result<TriagePrediction, EngineError> {
        let prompt = predict::prediction_prompt(title, description);
        let raw = self
            .llm
            .generate_fast(&prompt, None)
            .await
            .map_err(|e| EngineError::Prediction(e.to_string()))?;
        parse_prediction(&raw)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }
}
