//! Word sources — the external collaborators that supply candidate words.
//!
//! The filler only sees `WordSource::lookup(pattern)`. A pattern is a string of
//! length L over `a-z` and `?`, e.g. `"r??ls"`.
//!
//! Backends:
//! - `StaticWordSource` — in-memory table (tests, offline runs)
//! - `DatamuseWordSource` — dictionary API lookup
//! - `LlmWordSource` — themed candidates from the language model

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

pub mod datamuse;
pub mod llm;
pub mod prompts;

pub use datamuse::DatamuseWordSource;
pub use llm::LlmWordSource;

/// Wildcard for an unknown letter in a pattern.
pub const WILDCARD: char = '?';

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// A candidate word with optional dictionary definitions.
///
/// Definitions carry a tab-delimited part-of-speech prefix: `"n\tA track for a train"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub word: String,
    #[serde(default)]
    pub defs: Vec<String>,
}

impl Candidate {
    pub fn new(word: impl Into<String>, defs: Vec<String>) -> Self {
        Self {
            word: word.into(),
            defs,
        }
    }

    /// Text of the first definition with its part-of-speech prefix removed.
    /// `None` when there is no definition or it is blank.
    pub fn first_definition(&self) -> Option<&str> {
        let def = self.defs.first()?;
        let text = def.split_once('\t').map_or(def.as_str(), |(_, text)| text);
        let text = text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// The word-source contract.
///
/// "No results" is `Ok(vec![])`. Errors are logged by the filler and treated
/// the same as an empty list.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn lookup(&self, pattern: &str) -> Result<Vec<Candidate>, WordSourceError>;
}

/// True when `word` has the pattern's length and agrees with every known letter.
pub fn matches_pattern(word: &str, pattern: &str) -> bool {
    word.chars().count() == pattern.chars().count()
        && word
            .chars()
            .zip(pattern.chars())
            .all(|(w, p)| p == WILDCARD || w.eq_ignore_ascii_case(&p))
}

// ────────────────────────────────────────────────────────────────────────────
// StaticWordSource
// ────────────────────────────────────────────────────────────────────────────

/// Fixed in-memory word list. Returns every entry matching the pattern.
#[derive(Debug, Clone, Default)]
pub struct StaticWordSource {
    entries: Vec<Candidate>,
}

impl StaticWordSource {
    pub fn new(entries: Vec<Candidate>) -> Self {
        Self { entries }
    }

    /// A small built-in list used when no network source is configured.
    pub fn builtin() -> Self {
        let entries = BUILTIN_WORDS
            .iter()
            .map(|(word, def)| Candidate::new(*word, vec![format!("n\t{def}")]))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl WordSource for StaticWordSource {
    async fn lookup(&self, pattern: &str) -> Result<Vec<Candidate>, WordSourceError> {
        Ok(self
            .entries
            .iter()
            .filter(|c| matches_pattern(&c.word, pattern))
            .cloned()
            .collect())
    }
}

const BUILTIN_WORDS: &[(&str, &str)] = &[
    ("area", "A particular extent of space or surface"),
    ("east", "The direction of the sunrise"),
    ("iron", "A metallic element used to make steel"),
    ("rate", "A measured quantity per unit of another"),
    ("seat", "Something to sit on"),
    ("tear", "A drop from the eye"),
    ("rails", "Tracks for a train"),
    ("stare", "A fixed, intent look"),
    ("arise", "Come into being"),
    ("alone", "Without company"),
    ("irate", "Feeling great anger"),
    ("snare", "A trap for small animals"),
    ("atone", "Make amends"),
    ("tenor", "A male singing voice"),
    ("store", "A shop"),
    ("oater", "A western film"),
    ("eaten", "Consumed as food"),
    ("siren", "A warning signal"),
    ("later", "At a subsequent time"),
    ("trend", "A general direction of change"),
    ("stream", "A small river"),
    ("senior", "Older in rank or age"),
    ("retain", "Keep possession of"),
    ("trains", "Rail vehicles"),
    ("station", "A stopping place for trains"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_definition_strips_pos_prefix() {
        let c = Candidate::new("rails", vec!["n\tA track for a train".to_string()]);
        assert_eq!(c.first_definition(), Some("A track for a train"));
    }

    #[test]
    fn test_first_definition_without_tab_uses_whole_text() {
        let c = Candidate::new("rails", vec!["Tracks".to_string()]);
        assert_eq!(c.first_definition(), Some("Tracks"));
    }

    #[test]
    fn test_first_definition_missing_or_blank() {
        assert_eq!(Candidate::new("rails", vec![]).first_definition(), None);
        assert_eq!(
            Candidate::new("rails", vec!["n\t  ".to_string()]).first_definition(),
            None
        );
    }

    #[test]
    fn test_candidate_deserializes_without_defs() {
        let c: Candidate = serde_json::from_str(r#"{"word": "rails", "score": 1200}"#).unwrap();
        assert_eq!(c.word, "rails");
        assert!(c.defs.is_empty());
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("RAILS", "r??ls"));
        assert!(matches_pattern("rails", "?????"));
        assert!(!matches_pattern("rails", "r??l"));
        assert!(!matches_pattern("rails", "t????"));
    }

    #[tokio::test]
    async fn test_static_source_filters_by_pattern() {
        let source = StaticWordSource::new(vec![
            Candidate::new("RAILS", vec!["n\tA track for a train".to_string()]),
            Candidate::new("TRAIN", vec![]),
        ]);

        let hits = source.lookup("?a???").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].word, "RAILS");

        assert!(source.lookup("??").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builtin_source_has_defined_words() {
        let source = StaticWordSource::builtin();
        assert!(!source.is_empty());
        let hits = source.lookup("?????").await.unwrap();
        assert!(hits.iter().all(|c| c.first_definition().is_some()));
    }
}
