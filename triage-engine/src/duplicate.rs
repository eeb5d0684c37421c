//! Duplicate-detection workflow.
//!
//! Pipeline: embed the new description → vector search (server-side
//! threshold and ranking) → per-candidate reasoning fan-out → ranked list.
//!
//! Two failure policies shape this module:
//! - **fail-open** on the upstream steps: duplicate suggestions are an
//!   advisory feature, so embedding or search failures degrade to "no
//!   duplicates found" instead of surfacing an error to the submitter;
//! - **per-candidate isolation** for reasoning: one failed explanation
//!   call leaves that candidate without `reasoning` and never drops it.
//!
//! Reasoning calls run concurrently (bounded fan-out) and are re-joined by
//! candidate index, so completion order never affects output order — the
//! list stays in similarity-rank order.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::errors::EngineError;
use crate::providers::{EmbeddingsProvider, Explainer, SimilaritySearch};
use crate::record::DuplicateCandidate;

/// Duplicate detector over pluggable embedding/search/explanation backends.
pub struct DuplicateDetector<E, S, X> {
    embedder: E,
    search: S,
    explainer: X,
    threshold: f32,
    limit: u64,
    explain_concurrency: usize,
}

impl<E, S, X> DuplicateDetector<E, S, X>
where
    E: EmbeddingsProvider,
    S: SimilaritySearch,
    X: Explainer,
{
    pub fn new(
        embedder: E,
        search: S,
        explainer: X,
        threshold: f32,
        limit: u64,
        explain_concurrency: usize,
    ) -> Self {
        Self {
            embedder,
            search,
            explainer,
            threshold,
            limit,
            explain_concurrency,
        }
    }

    /// Finds ranked duplicate candidates for a new description.
    ///
    /// Never returns an error: upstream failures are logged and degrade to
    /// an empty list. An empty list therefore means "no duplicate warning",
    /// whether because nothing matched or because the check was unavailable.
    pub async fn find_duplicates(
        &self,
        description: &str,
        project_id: Option<&str>,
    ) -> Vec<DuplicateCandidate> {
        match self.ranked_candidates(description, project_id).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(error = %err, "duplicate check unavailable; failing open with empty list");
                Vec::new()
            }
        }
    }

    async fn ranked_candidates(
        &self,
        description: &str,
        project_id: Option<&str>,
    ) -> Result<Vec<DuplicateCandidate>, EngineError> {
        let vector = self.embedder.embed(description).await?;
        let hits = self
            .search
            .search(vector, self.threshold, self.limit, project_id)
            .await?;

        if hits.is_empty() {
            debug!("no candidates above threshold");
            return Ok(Vec::new());
        }

        let mut candidates: Vec<DuplicateCandidate> =
            hits.into_iter().map(DuplicateCandidate::from_hit).collect();

        // Bounded fan-out; results re-join by index, not completion order.
        let annotated: Vec<(usize, Option<String>)> =
            stream::iter(candidates.iter().enumerate().map(|(i, candidate)| {
                let explainer = &self.explainer;
                async move {
                    match explainer.explain(description, &candidate.description).await {
                        Ok(text) => (i, Some(text)),
                        Err(err) => {
                            warn!(
                                candidate = %candidate.id,
                                error = %err,
                                "reasoning call failed; keeping candidate without reasoning"
                            );
                            (i, None)
                        }
                    }
                }
            }))
            .buffer_unordered(self.explain_concurrency.max(1))
            .collect()
            .await;

        for (i, reasoning) in annotated {
            candidates[i].reasoning = reasoning;
        }

        debug!(candidates = candidates.len(), "duplicate check completed");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BugHit, BugRecord};
    use triage_nlp::{Category, Severity};

    struct FakeEmbedder {
        fail: bool,
    }

    impl EmbeddingsProvider for FakeEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EngineError> {
            if self.fail {
                Err(EngineError::Embedding("embedding backend down".into()))
            } else {
                Ok(vec![0.5; 8])
            }
        }
    }

    struct FakeSearch {
        hits: Vec<BugHit>,
        fail: bool,
    }

    impl SimilaritySearch for FakeSearch {
        async fn search(
            &self,
            _vector: Vec<f32>,
            _threshold: f32,
            _limit: u64,
            _project_id: Option<&str>,
        ) -> Result<Vec<BugHit>, EngineError> {
            if self.fail {
                Err(EngineError::Search("search backend down".into()))
            } else {
                Ok(self.hits.clone())
            }
        }
    }

    /// Fails for any existing description containing the marker word.
    struct FakeExplainer {
        fail_marker: Option<&'static str>,
    }

    impl Explainer for FakeExplainer {
        async fn explain(
            &self,
            _new_description: &str,
            existing_description: &str,
        ) -> Result<String, EngineError> {
            if let Some(marker) = self.fail_marker {
                if existing_description.contains(marker) {
                    return Err(EngineError::Explanation("model unavailable".into()));
                }
            }
            Ok(format!("Both describe: {existing_description}"))
        }
    }

    fn hit(id: &str, description: &str, similarity: f32) -> BugHit {
        BugHit {
            record: BugRecord {
                id: id.to_string(),
                title: format!("bug {id}"),
                description: description.to_string(),
                category: Category::Functional,
                severity: Severity::Medium,
                status: "open".to_string(),
                project_id: None,
            },
            similarity,
        }
    }

    fn detector(
        embed_fail: bool,
        search_fail: bool,
        hits: Vec<BugHit>,
        fail_marker: Option<&'static str>,
    ) -> DuplicateDetector<FakeEmbedder, FakeSearch, FakeExplainer> {
        DuplicateDetector::new(
            FakeEmbedder { fail: embed_fail },
            FakeSearch {
                hits,
                fail: search_fail,
            },
            FakeExplainer { fail_marker },
            0.82,
            3,
            3,
        )
    }

    #[tokio::test]
    async fn empty_search_yields_empty_list() {
        let d = detector(false, false, Vec::new(), None);
        assert!(d.find_duplicates("new bug", None).await.is_empty());
    }

    #[tokio::test]
    async fn search_failure_fails_open() {
        let d = detector(false, true, Vec::new(), None);
        assert!(d.find_duplicates("new bug", None).await.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_fails_open() {
        let d = detector(true, false, vec![hit("a", "crash on save", 0.9)], None);
        assert!(d.find_duplicates("new bug", None).await.is_empty());
    }

    #[tokio::test]
    async fn all_candidates_get_reasoning() {
        let d = detector(
            false,
            false,
            vec![
                hit("a", "crash on save", 0.95),
                hit("b", "crash on export", 0.88),
            ],
            None,
        );
        let out = d.find_duplicates("editor crashes", None).await;
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.reasoning.is_some()));
    }

    #[tokio::test]
    async fn one_failed_explanation_keeps_all_candidates() {
        let d = detector(
            false,
            false,
            vec![
                hit("a", "crash on save", 0.95),
                hit("b", "flaky sync job", 0.90),
                hit("c", "crash on export", 0.85),
            ],
            Some("flaky"),
        );
        let out = d.find_duplicates("editor crashes", None).await;

        assert_eq!(out.len(), 3);
        assert!(out[0].reasoning.is_some());
        assert!(out[1].reasoning.is_none());
        assert!(out[2].reasoning.is_some());
    }

    #[tokio::test]
    async fn output_preserves_search_ranking() {
        let d = detector(
            false,
            false,
            vec![
                hit("first", "crash on save", 0.97),
                hit("second", "crash on load", 0.90),
                hit("third", "crash on export", 0.83),
            ],
            None,
        );
        let out = d.find_duplicates("editor crashes", None).await;

        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        assert!(out.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }
}
