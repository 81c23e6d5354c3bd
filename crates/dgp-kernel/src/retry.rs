// retry.rs — RetryPressure (§4.3).
//
// Scores uncertainty phrases and placeholder markers. Uncertainty phrases
// count once each regardless of repetition; placeholder markers count
// every occurrence.

use regex::RegexBuilder;

use crate::numeric::{round_2dp, round_half_up};

/// Frozen, case-insensitive, matched anywhere in the output.
pub const UNCERTAINTY_PHRASES: &[&str] = &[
    "not sure",
    "unclear",
    "maybe",
    "might be",
    "possibly",
    "i think",
    "i believe",
    "could be",
    "hard to say",
    "difficult to determine",
    "should i",
    "should we",
];

/// Frozen, word-boundary, case-insensitive.
pub const PLACEHOLDER_PATTERNS: &[&str] = &["TODO", "TBD", "FIXME"];

#[derive(Debug, Clone, PartialEq)]
pub struct RetryAnalysis {
    pub score: i64,
    /// Matched literal substrings (catalog surface form), deduplicated, in
    /// ascending order of first occurrence in the output.
    pub signals: Vec<String>,
    pub normalized: f64,
}

pub fn analyze(output: &str) -> RetryAnalysis {
    let lower = output.to_lowercase();

    let mut uncertainty_count = 0;
    let mut first_occurrence: Vec<(usize, String)> = Vec::new();

    for phrase in UNCERTAINTY_PHRASES {
        if let Some(pos) = lower.find(phrase) {
            uncertainty_count += 1;
            first_occurrence.push((pos, (*phrase).to_string()));
        }
    }

    let mut todo_count = 0;
    for pattern in PLACEHOLDER_PATTERNS {
        let re = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(pattern)))
            .case_insensitive(true)
            .build()
            .expect("placeholder pattern is a fixed literal");
        let matches: Vec<_> = re.find_iter(output).collect();
        todo_count += matches.len();
        if let Some(first) = matches.first() {
            first_occurrence.push((first.start(), (*pattern).to_string()));
        }
    }

    first_occurrence.sort_by_key(|(pos, _)| *pos);
    let signals = first_occurrence.into_iter().map(|(_, s)| s).collect();

    let normalized = round_2dp((0.1 * uncertainty_count as f64 + 0.2 * todo_count as f64).min(1.0));
    let score = (100 - round_half_up(normalized * 100.0)).max(0);

    RetryAnalysis { score, signals, normalized }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncertainty_phrase_counts_once_regardless_of_repetition() {
        let result = analyze("I'm not sure. Honestly, not sure at all.");
        assert_eq!(result.normalized, 0.1);
        assert_eq!(result.signals, vec!["not sure".to_string()]);
    }

    #[test]
    fn placeholders_count_every_occurrence() {
        let result = analyze("TODO: fix this. TODO: fix that too.");
        assert_eq!(result.normalized, 0.4);
    }

    #[test]
    fn placeholder_matching_is_word_boundary() {
        let result = analyze("methodology and TODO remain.");
        assert_eq!(result.normalized, 0.2);
    }

    #[test]
    fn normalized_saturates_at_one() {
        let text = "not sure unclear maybe might be possibly i think i believe could be \
                     hard to say difficult to determine should i should we TODO TBD FIXME";
        let result = analyze(text);
        assert_eq!(result.normalized, 1.0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn signals_ordered_by_first_occurrence_position() {
        let result = analyze("TODO this, but maybe not sure.");
        assert_eq!(result.signals, vec!["TODO".to_string(), "maybe".to_string(), "not sure".to_string()]);
    }

    #[test]
    fn clean_output_has_full_score() {
        let result = analyze("The endpoint returns a 200 status with the user payload.");
        assert_eq!(result.score, 100);
        assert!(result.signals.is_empty());
    }
}
