//! Shared domain vocabulary and the per-analysis result shape.
//!
//! `Category` and `Severity` are closed sets owned by the bug tracker; the
//! engine labels against them but never invents new values. Parsing an
//! unknown wire value is a serde error (fail closed), not a fallback.

use serde::{Deserialize, Serialize};

use crate::entities::Entity;

/// Bug category as stored by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    UiUx,
    Functional,
    Performance,
    Security,
    DataLogic,
    Integration,
}

impl Category {
    /// Wire name used in vector payloads and model prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::UiUx => "ui_ux",
            Category::Functional => "functional",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::DataLogic => "data_logic",
            Category::Integration => "integration",
        }
    }
}

/// Bug severity as stored by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Result of one full analysis pass over a bug description.
///
/// Produced per call and immutable afterwards; the caller decides whether
/// and where to persist it. The embedding comes from the external provider,
/// keywords and entities from the deterministic extractors in this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Fixed-length, L2-normalized vector for the full text.
    pub embedding: Vec<f32>,
    /// Tagged component / error-code entities found in the text.
    pub entities: Vec<Entity>,
    /// Up to five unique candidate phrases, most salient first.
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names() {
        let c: Category = serde_json::from_str("\"data_logic\"").unwrap();
        assert_eq!(c, Category::DataLogic);
        assert_eq!(serde_json::to_string(&Category::UiUx).unwrap(), "\"ui_ux\"");
    }

    #[test]
    fn unknown_category_fails_closed() {
        let res: Result<Category, _> = serde_json::from_str("\"misc\"");
        assert!(res.is_err());
    }

    #[test]
    fn severity_round_trip() {
        for s in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ] {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
            let back: Severity = serde_json::from_str(&json).unwrap();
            assert_eq!(back, s);
        }
    }
}
