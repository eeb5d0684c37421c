//! Dictionary/regex entity tagging.
//!
//! Two entity kinds are recognised: known component names (fixed
//! dictionary, canonical casing) and the HTTP error codes the tracker
//! cares about. Nothing else — this is a tagger for triage routing, not a
//! general NER pass.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical component names the tracker routes bugs to.
const COMPONENTS: &[&str] = &["UI", "Backend", "Database", "Mobile", "API", "Auth", "Payment"];

/// Error codes worth tagging. No word boundaries: the original matched raw
/// digit runs anywhere in the text, and that behavior is kept.
static ERROR_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("404|500|403|401").expect("valid error-code pattern"));

/// Kind of a tagged entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Component,
    ErrorCode,
}

/// One tagged span of the input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Canonical component name, or the matched digits for error codes.
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    fn component(name: &str) -> Self {
        Self {
            text: name.to_string(),
            label: EntityLabel::Component,
        }
    }

    fn error_code(code: &str) -> Self {
        Self {
            text: code.to_string(),
            label: EntityLabel::ErrorCode,
        }
    }
}

/// Tags component names and error codes in `text`.
///
/// Component matching is a case-insensitive substring test; each dictionary
/// term is emitted at most once, with its canonical casing. Error codes are
/// emitted once per occurrence — repeated codes are deliberately not
/// deduplicated.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let lowered = text.to_lowercase();
    let mut out = Vec::new();

    for name in COMPONENTS {
        if lowered.contains(&name.to_lowercase()) {
            out.push(Entity::component(name));
        }
    }

    for m in ERROR_CODE_RE.find_iter(text) {
        out.push(Entity::error_code(m.as_str()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(entities: &[Entity]) -> Vec<&str> {
        entities
            .iter()
            .filter(|e| e.label == EntityLabel::Component)
            .map(|e| e.text.as_str())
            .collect()
    }

    fn codes(entities: &[Entity]) -> Vec<&str> {
        entities
            .iter()
            .filter(|e| e.label == EntityLabel::ErrorCode)
            .map(|e| e.text.as_str())
            .collect()
    }

    #[test]
    fn database_auth_api_with_500() {
        let entities = extract_entities("Database error 500 when calling the Auth API");
        // Components come out in dictionary order, not text order.
        assert_eq!(components(&entities), vec!["Database", "API", "Auth"]);
        assert_eq!(codes(&entities), vec!["500"]);
    }

    #[test]
    fn canonical_casing_regardless_of_input() {
        let entities = extract_entities("the PAYMENT form and the backend both hang");
        assert_eq!(components(&entities), vec!["Backend", "Payment"]);
    }

    #[test]
    fn repeated_error_codes_are_kept() {
        let entities = extract_entities("got 404, retried, got 404 again and then 500");
        assert_eq!(codes(&entities), vec!["404", "404", "500"]);
    }

    #[test]
    fn no_entities_in_plain_text() {
        assert!(extract_entities("nothing interesting here").is_empty());
    }
}
