//! Structured triage prediction: category/severity suggestion via the fast
//! generation profile.
//!
//! Models wrap JSON in code fences or prose more often than not, so parsing
//! is two-staged: a best-effort extraction of the outermost JSON object,
//! then a strict serde decode into the tagged [`TriagePrediction`]. Unknown
//! categories/severities or missing fields fail closed with a typed error —
//! the engine never trusts an arbitrary JSON shape.

use serde::{Deserialize, Serialize};
use triage_nlp::{Category, Severity};

use crate::errors::EngineError;

/// Model-suggested triage labels with per-field confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriagePrediction {
    pub category: Category,
    pub severity: Severity,
    /// Confidence in [0, 1] for the category label.
    pub category_confidence: f32,
    /// Confidence in [0, 1] for the severity label.
    pub severity_confidence: f32,
    /// One-to-two sentence rationale from the model.
    pub explanation: String,
}

/// Builds the strict-JSON prompt for a title/description pair.
pub(crate) fn prediction_prompt(title: &str, description: &str) -> String {
    format!(
        "Classify this bug report.\n\nTitle: {title}\nDescription: {description}\n\n\
         Respond with ONLY a JSON object, no markdown:\n\
         {{\"category\": one of [\"ui_ux\",\"functional\",\"performance\",\"security\",\
         \"data_logic\",\"integration\"],\n\
         \"severity\": one of [\"critical\",\"high\",\"medium\",\"low\"],\n\
         \"category_confidence\": number 0..1,\n\
         \"severity_confidence\": number 0..1,\n\
         \"explanation\": short string}}"
    )
}

/// Parses raw model output into a [`TriagePrediction`].
///
/// Tolerates code fences and surrounding prose; fails closed on anything
/// that does not decode into the expected shape. Confidence values are
/// clamped into [0, 1].
///
/// # Errors
/// [`EngineError::Prediction`] when no JSON object is present,
/// [`EngineError::Parse`] when the object has the wrong shape.
pub fn parse_prediction(raw: &str) -> Result<TriagePrediction, EngineError> {
    let block = extract_json_block(raw)
        .ok_or_else(|| EngineError::Prediction("no JSON object in model output".into()))?;

    let mut prediction: TriagePrediction = serde_json::from_str(block)?;
    prediction.category_confidence = prediction.category_confidence.clamp(0.0, 1.0);
    prediction.severity_confidence = prediction.severity_confidence.clamp(0.0, 1.0);
    Ok(prediction)
}

/// Best-effort extraction of the outermost JSON object from model output.
///
/// Strips common code-fence wrappers first, then takes the substring from
/// the first `{` to the last `}`.
fn extract_json_block(raw: &str) -> Option<&str> {
    let mut t = raw.trim();
    if let Some(stripped) = t.strip_prefix("```json").or_else(|| t.strip_prefix("```")) {
        t = stripped;
        if let Some(pos) = t.rfind("```") {
            t = &t[..pos];
        }
    }
    let start = t.find('{')?;
    let end = t.rfind('}')?;
    if end < start {
        return None;
    }
    Some(t[start..=end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"category":"security","severity":"critical",
        "category_confidence":0.92,"severity_confidence":0.85,
        "explanation":"Token validation is bypassed."}"#;

    #[test]
    fn parses_clean_json() {
        let p = parse_prediction(CLEAN).unwrap();
        assert_eq!(p.category, Category::Security);
        assert_eq!(p.severity, Severity::Critical);
        assert_eq!(p.category_confidence, 0.92);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = format!("```json\n{CLEAN}\n```");
        let p = parse_prediction(&raw).unwrap();
        assert_eq!(p.category, Category::Security);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let raw = format!("Sure! Here is the classification:\n{CLEAN}\nHope that helps.");
        let p = parse_prediction(&raw).unwrap();
        assert_eq!(p.severity, Severity::Critical);
    }

    #[test]
    fn clamps_out_of_range_confidence() {
        let raw = r#"{"category":"functional","severity":"low",
            "category_confidence":1.7,"severity_confidence":-0.2,
            "explanation":"x"}"#;
        let p = parse_prediction(raw).unwrap();
        assert_eq!(p.category_confidence, 1.0);
        assert_eq!(p.severity_confidence, 0.0);
    }

    #[test]
    fn unknown_category_fails_closed() {
        let raw = r#"{"category":"misc","severity":"low",
            "category_confidence":0.5,"severity_confidence":0.5,
            "explanation":"x"}"#;
        assert!(matches!(
            parse_prediction(raw),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn missing_json_is_a_prediction_error() {
        assert!(matches!(
            parse_prediction("I could not classify this bug."),
            Err(EngineError::Prediction(_))
        ));
    }

    #[test]
    fn prompt_names_every_label() {
        let prompt = prediction_prompt("t", "d");
        for label in ["ui_ux", "data_logic", "critical", "low"] {
            assert!(prompt.contains(label));
        }
    }
}
