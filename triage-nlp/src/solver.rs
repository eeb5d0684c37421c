//! Rule-based solution table.
//!
//! A deterministic decision table, not a classifier: each rule carries a
//! trigger set and a canned root-cause/steps/snippet tuple. Rules are
//! evaluated in declaration order and the first match wins, so a text
//! mentioning both "auth" and "ui" resolves to the auth branch. Extend the
//! table by appending entries; never reorder existing ones, the order is
//! the tie-break policy.
//!
//! Trigger matching is plain substring containment over the lowercased
//! text. That means "ui" can fire inside unrelated words — a known
//! limitation of the heuristic that is kept as-is.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canned solution for a recognised bug pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    /// Short diagnosis of the likely root cause.
    pub root_cause: String,
    /// Ordered remediation instructions.
    pub steps: Vec<String>,
    /// Optional code snippet illustrating the fix.
    pub fix_snippet: Option<String>,
    /// Heuristic confidence in [0, 1].
    pub confidence: f32,
}

struct Rule {
    name: &'static str,
    triggers: &'static [&'static str],
    root_cause: &'static str,
    steps: &'static [&'static str],
    fix_snippet: Option<&'static str>,
    confidence: f32,
}

const RULES: &[Rule] = &[
    Rule {
        name: "auth",
        triggers: &["auth", "login", "401", "403"],
        root_cause: "Authentication or authorization failure: the session token is missing, \
                     expired, or rejected by the backend.",
        steps: &[
            "Reproduce the failure and capture the exact HTTP status (401 vs 403).",
            "Verify the Supabase session token in browser storage.",
            "Confirm the token refresh logic runs before the session expires.",
            "Check the row-level security policies on the affected tables.",
        ],
        fix_snippet: Some(
            "const { data: { session } } = await supabase.auth.getSession();\n\
             if (!session) {\n  await supabase.auth.refreshSession();\n}",
        ),
        confidence: 0.88,
    },
    Rule {
        name: "ui",
        triggers: &["ui", "css", "layout", "responsive"],
        root_cause: "UI Rendering mismatch: styling or layout rules do not match the target \
                     viewport.",
        steps: &[
            "Reproduce across the affected breakpoints with device emulation.",
            "Inspect the computed styles on the broken element.",
            "Look for conflicting utility classes on the parent container.",
            "Verify the responsive variants cover the smallest supported viewport.",
        ],
        fix_snippet: Some(
            "<nav className=\"hidden md:flex items-center gap-4\">\n  {/* desktop nav */}\n</nav>",
        ),
        confidence: 0.82,
    },
    Rule {
        name: "database",
        triggers: &["database", "sql", "query", "postgres"],
        root_cause: "Query or schema mismatch: the statement no longer lines up with the \
                     current table definition.",
        steps: &[
            "Run the failing query directly against a staging database.",
            "Compare the selected columns with the live schema.",
            "Check recent migrations for renamed or dropped columns.",
            "Inspect the query plan for sequential scans on large tables.",
        ],
        fix_snippet: Some(
            "SELECT column_name, data_type\nFROM information_schema.columns\n\
             WHERE table_name = 'bugs';",
        ),
        confidence: 0.85,
    },
];

const FALLBACK_ROOT_CAUSE: &str =
    "No known pattern matched; the description needs more diagnostic context.";

const FALLBACK_STEPS: &[&str] = &[
    "Reproduce the bug with verbose logging enabled.",
    "Capture the full error message and stack trace.",
    "Identify the most recent change that touched the affected area.",
    "Attach exact reproduction steps to the report.",
];

/// Maps `text` to a canned [`SolutionResult`] via the ordered rule table.
///
/// Idempotent: same input always returns the identical tuple. Unmatched
/// input gets the generic fallback with no fix snippet and confidence 0.65.
pub fn solve(text: &str) -> SolutionResult {
    let lowered = text.to_lowercase();

    for rule in RULES {
        if rule.triggers.iter().any(|t| lowered.contains(t)) {
            debug!(rule = rule.name, "solver rule matched");
            return SolutionResult {
                root_cause: rule.root_cause.to_string(),
                steps: rule.steps.iter().map(|s| s.to_string()).collect(),
                fix_snippet: rule.fix_snippet.map(str::to_string),
                confidence: rule.confidence,
            };
        }
    }

    debug!("no solver rule matched; returning fallback");
    SolutionResult {
        root_cause: FALLBACK_ROOT_CAUSE.to_string(),
        steps: FALLBACK_STEPS.iter().map(|s| s.to_string()).collect(),
        fix_snippet: None,
        confidence: 0.65,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_text_hits_auth_rule() {
        let sol = solve("Users report a login loop after the session expires");
        assert!(sol.root_cause.contains("Authentication"));
        assert!(
            sol.steps
                .iter()
                .any(|s| s == "Verify the Supabase session token in browser storage.")
        );
        assert_eq!(sol.confidence, 0.88);
    }

    #[test]
    fn status_401_hits_auth_rule() {
        let sol = solve("API returns 401 on every request");
        assert!(sol.root_cause.contains("Authentication"));
    }

    #[test]
    fn auth_outranks_ui_when_both_trigger() {
        let sol = solve("The auth screen has a broken ui layout");
        assert!(sol.root_cause.contains("Authentication"));
    }

    #[test]
    fn layout_text_hits_ui_rule() {
        let sol = solve("The layout is broken on mobile devices");
        assert!(sol.root_cause.contains("UI Rendering"));
        let snippet = sol.fix_snippet.expect("ui rule carries a snippet");
        assert!(snippet.contains("hidden md:flex"));
        assert_eq!(sol.confidence, 0.82);
    }

    #[test]
    fn sql_text_hits_database_rule() {
        let sol = solve("Nightly report query times out on postgres");
        assert!(sol.root_cause.contains("Query or schema mismatch"));
        assert_eq!(sol.confidence, 0.85);
        assert_eq!(sol.steps.len(), 4);
    }

    #[test]
    fn unmatched_text_falls_back() {
        let sol = solve("Something feels slow sometimes");
        assert!(sol.fix_snippet.is_none());
        assert_eq!(sol.confidence, 0.65);
        assert!(!sol.steps.is_empty());
    }

    #[test]
    fn solve_is_idempotent() {
        let text = "login fails with 403 on the admin page";
        assert_eq!(solve(text), solve(text));
    }
}
