//! RAKE-style keyword extraction.
//!
//! Scores candidate phrases by the classic degree/frequency heuristic:
//! words that co-occur inside longer phrases accumulate degree, and a
//! phrase scores as the sum of its member-word scores. Multi-word technical
//! terms ("payment checkout page") therefore outrank isolated frequent
//! words, which is exactly the signal we want from bug descriptions.

use std::collections::{HashMap, HashSet};

use crate::stopwords::candidate_phrases;

/// Maximum number of keywords returned per text.
pub const MAX_KEYWORDS: usize = 5;

/// Extracts up to [`MAX_KEYWORDS`] unique phrases, most salient first.
///
/// Deterministic: identical input always yields identical ordered output.
/// Ties keep the original phrase order (stable sort, no explicit tie-break).
pub fn extract_keywords(text: &str) -> Vec<String> {
    let phrases = candidate_phrases(text);
    if phrases.is_empty() {
        return Vec::new();
    }

    // Word frequency and degree over all phrase occurrences.
    let mut freq: HashMap<&str, f64> = HashMap::new();
    let mut degree: HashMap<&str, f64> = HashMap::new();
    for phrase in &phrases {
        let words: Vec<&str> = phrase.split(' ').collect();
        let co_occurrence = (words.len() - 1) as f64;
        for word in words {
            *freq.entry(word).or_insert(0.0) += 1.0;
            *degree.entry(word).or_insert(0.0) += co_occurrence;
        }
    }

    // Word score = (degree + freq) / freq; a lone word scores 1.0.
    let mut scored: Vec<(f64, &String)> = phrases
        .iter()
        .map(|phrase| {
            let score: f64 = phrase
                .split(' ')
                .map(|w| (degree[w] + freq[w]) / freq[w])
                .sum();
            (score, phrase)
        })
        .collect();

    // Stable sort keeps original order among equal scores.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(MAX_KEYWORDS);
    for (_, phrase) in scored {
        if seen.insert(phrase.as_str()) {
            out.push(phrase.clone());
            if out.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_most_five_unique_long_phrases() {
        let text = "Checkout fails. Checkout fails. Payment gateway timeout, slow database \
                    queries, broken navigation menu, missing error toast, flaky session refresh, \
                    cart totals wrong";
        let kws = extract_keywords(text);
        assert!(kws.len() <= MAX_KEYWORDS);
        let unique: std::collections::HashSet<&String> = kws.iter().collect();
        assert_eq!(unique.len(), kws.len());
        for kw in &kws {
            assert!(kw.len() > 3, "keyword too short: {kw:?}");
        }
    }

    #[test]
    fn payment_checkout_sentence() {
        let text = "The application crashes on the payment checkout page specifically when \
                    using credit cards.";
        let kws = extract_keywords(text);
        let joined = kws.join(" ");
        assert!(joined.contains("payment"), "missing 'payment' in {kws:?}");
        assert!(joined.contains("checkout"), "missing 'checkout' in {kws:?}");
    }

    #[test]
    fn longer_phrases_rank_first() {
        let kws = extract_keywords("Login broken. Login broken. Payment checkout page broken");
        assert_eq!(kws.first().map(String::as_str), Some("payment checkout page broken"));
    }

    #[test]
    fn empty_and_stopword_only_input() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("the is at on a to").is_empty());
    }

    #[test]
    fn deterministic_across_runs() {
        let text = "Database timeouts during nightly sync; pagination cursor resets and search \
                    results duplicate entries";
        assert_eq!(extract_keywords(text), extract_keywords(text));
    }

    #[test]
    fn duplicates_collapse_to_one_entry() {
        let kws = extract_keywords("session expires, session expires, session expires");
        assert_eq!(kws, vec!["session expires"]);
    }
}
