//! Candidate validation — one seam for every "is this word acceptable" rule.

use std::collections::HashSet;

use crate::word_source::Candidate;

/// Decides whether a candidate may fill a slot of `target_length` letters.
/// Placement compatibility with the grid is checked separately by the filler.
pub trait Validator: Send + Sync {
    fn validate(&self, candidate: &Candidate, target_length: usize) -> bool;
}

/// Words never placed in a puzzle.
const DEFAULT_DENYLIST: &[&str] = &[
    "arse", "bitch", "cock", "crap", "damn", "dick", "fuck", "hell", "nazi", "piss", "rape",
    "shit", "slut", "twat", "whore",
];

/// Default validator: exact length, ASCII letters only, not denylisted, and a
/// non-blank first definition to build the clue from.
#[derive(Debug, Clone)]
pub struct DictionaryValidator {
    denylist: HashSet<String>,
}

impl Default for DictionaryValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().copied())
    }
}

impl DictionaryValidator {
    pub fn new<I, S>(denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denylist: denylist
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_denied(&self, word: &str) -> bool {
        self.denylist.contains(&word.to_ascii_lowercase())
    }
}

impl Validator for DictionaryValidator {
    fn validate(&self, candidate: &Candidate, target_length: usize) -> bool {
        let word = candidate.word.as_str();

        word.len() == target_length
            && word.chars().all(|c| c.is_ascii_alphabetic())
            && !self.is_denied(word)
            && candidate.first_definition().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rails() -> Candidate {
        Candidate::new("RAILS", vec!["n\tA track for a train".to_string()])
    }

    #[test]
    fn test_accepts_well_formed_candidate() {
        assert!(DictionaryValidator::default().validate(&rails(), 5));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!DictionaryValidator::default().validate(&rails(), 4));
    }

    #[test]
    fn test_rejects_non_letters() {
        let v = DictionaryValidator::default();
        let spaced = Candidate::new("ice t", vec!["n\tA drink".to_string()]);
        let hyphen = Candidate::new("re-do", vec!["v\tDo again".to_string()]);
        let accented = Candidate::new("café", vec!["n\tA coffee shop".to_string()]);
        assert!(!v.validate(&spaced, 5));
        assert!(!v.validate(&hyphen, 5));
        assert!(!v.validate(&accented, 4));
    }

    #[test]
    fn test_rejects_denylisted_any_case() {
        let v = DictionaryValidator::default();
        let bad = Candidate::new("DAMN", vec!["v\tCondemn".to_string()]);
        assert!(!v.validate(&bad, 4));
    }

    #[test]
    fn test_rejects_missing_definition() {
        let v = DictionaryValidator::default();
        assert!(!v.validate(&Candidate::new("RAILS", vec![]), 5));
    }

    #[test]
    fn test_custom_denylist() {
        let v = DictionaryValidator::new(["rails"]);
        assert!(!v.validate(&rails(), 5));
        assert!(!v.is_denied("damn"));
    }
}
