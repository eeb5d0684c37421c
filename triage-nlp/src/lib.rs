//! Deterministic NLP core for bug triage.
//!
//! This crate contains the pure text-analysis pieces of the triage engine:
//! - Candidate-phrase segmentation with a fixed stop-word set
//! - RAKE-style keyword extraction (degree/frequency phrase scoring)
//! - Dictionary/regex entity tagging (components and HTTP error codes)
//! - A rule-based solver mapping a description to a canned solution
//!
//! Everything here is a pure function of its input text: no I/O, no async,
//! no hidden state. Same input always yields the same output, which is what
//! makes these pieces independently testable. Embedding and generation live
//! in the sibling crates and are composed on top by `triage-engine`.

mod entities;
mod keywords;
mod solver;
mod stopwords;
mod types;

pub use entities::{Entity, EntityLabel, extract_entities};
pub use keywords::{MAX_KEYWORDS, extract_keywords};
pub use solver::{SolutionResult, solve};
pub use stopwords::{STOPWORDS, candidate_phrases, is_stopword};
pub use types::{AnalysisResult, Category, Severity};
