//! Data shapes crossing the engine boundary: stored bug payloads, search
//! hits, and duplicate candidates.

use serde::{Deserialize, Serialize};
use triage_nlp::{Category, Severity};

/// Bug report as stored alongside its vector in the collection payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugRecord {
    /// Tracker-side identifier (UUID string).
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    /// Tracker workflow state (`open`, `in_progress`, ...). Kept opaque:
    /// the engine never branches on it.
    pub status: String,
    /// Optional project scope used for filtered search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// One similarity-search hit, ranked by the store.
#[derive(Debug, Clone)]
pub struct BugHit {
    pub record: BugRecord,
    /// Cosine similarity in [0, 1].
    pub similarity: f32,
}

/// One ranked duplicate candidate returned to the submitter flow.
///
/// `reasoning` is attached best-effort after the similarity ranking; a
/// failed reasoning call leaves it `None` without dropping the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub status: String,
    /// Cosine similarity in [0, 1]; the list is ordered descending on it.
    pub similarity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl DuplicateCandidate {
    /// Builds a candidate (without reasoning yet) from a search hit.
    pub fn from_hit(hit: BugHit) -> Self {
        Self {
            id: hit.record.id,
            title: hit.record.title,
            description: hit.record.description,
            category: hit.record.category,
            severity: hit.record.severity,
            status: hit.record.status,
            similarity: hit.similarity,
            reasoning: None,
        }
    }
}
