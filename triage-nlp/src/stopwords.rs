//! Candidate-phrase segmentation with a fixed stop-word set.
//!
//! The splitter mirrors classic RAKE preprocessing: punctuation delimiters
//! cut the text into segments, and stop-words cut segments into candidate
//! phrases. The stop-word list is intentionally small and hard-coded; it is
//! part of the scoring contract, not a tunable.

/// Stop-words that terminate a candidate phrase. The word itself is dropped.
pub const STOPWORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "this", "that", "it", "to", "for", "with", "and", "was",
    "were", "had", "has", "in", "out", "by", "be", "an", "as",
];

/// Punctuation that splits text into independent segments before
/// stop-word splitting.
const DELIMITERS: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~',
    '(', ')',
];

/// Minimum phrase length in characters; anything at or below is noise.
const MIN_PHRASE_LEN: usize = 3;

/// Returns true if `word` is in the fixed stop-word set.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Splits `text` into lowercased candidate phrases.
///
/// A phrase is a maximal run of non-stop-words inside one punctuation
/// segment, joined with single spaces. Phrases of length <= 3 characters
/// are discarded. Empty input produces an empty vector.
pub fn candidate_phrases(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut phrases = Vec::new();

    for segment in lowered.split(DELIMITERS) {
        let mut current: Vec<&str> = Vec::new();
        for word in segment.split_whitespace() {
            if is_stopword(word) {
                flush(&mut current, &mut phrases);
            } else {
                current.push(word);
            }
        }
        flush(&mut current, &mut phrases);
    }

    phrases
}

fn flush(current: &mut Vec<&str>, phrases: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let phrase = current.join(" ");
    current.clear();
    if phrase.len() > MIN_PHRASE_LEN {
        phrases.push(phrase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_stopwords_and_punctuation() {
        let phrases = candidate_phrases("The login page crashes, and the session expires");
        assert_eq!(phrases, vec!["login page crashes", "session expires"]);
    }

    #[test]
    fn drops_short_phrases() {
        // "ui" is only two characters and falls below the length cutoff.
        let phrases = candidate_phrases("The ui on the checkout page");
        assert_eq!(phrases, vec!["checkout page"]);
    }

    #[test]
    fn empty_input() {
        assert!(candidate_phrases("").is_empty());
        assert!(candidate_phrases("   ").is_empty());
    }

    #[test]
    fn delimiters_cut_phrases() {
        let phrases = candidate_phrases("payment-gateway timeout");
        // '-' is a delimiter, so "payment" and "gateway timeout" are separate.
        assert_eq!(phrases, vec!["payment", "gateway timeout"]);
    }
}
