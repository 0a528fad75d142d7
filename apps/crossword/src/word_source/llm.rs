//! LLM word source — asks the model for themed candidates matching a pattern.
//!
//! The model is not trusted to respect the pattern: every reply is filtered
//! through `matches_pattern` before it reaches the filler.

use async_trait::async_trait;
use tracing::debug;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::word_source::prompts::{
    CANDIDATE_PROMPT_TEMPLATE, CANDIDATE_SYSTEM, THEME_INSTRUCTION_TEMPLATE,
};
use crate::word_source::{matches_pattern, Candidate, WordSource, WordSourceError};

pub struct LlmWordSource {
    llm: LlmClient,
    /// Optional headline the candidates should lean towards.
    theme: Option<String>,
}

impl LlmWordSource {
    pub fn new(llm: LlmClient, theme: Option<String>) -> Self {
        Self {
            llm,
            theme: theme.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl WordSource for LlmWordSource {
    async fn lookup(&self, pattern: &str) -> Result<Vec<Candidate>, WordSourceError> {
        let prompt = build_candidate_prompt(pattern, self.theme.as_deref());
        let system = format!("{CANDIDATE_SYSTEM} {JSON_ONLY_SYSTEM}");

        let raw: Vec<Candidate> = self.llm.call_json(&prompt, &system).await?;
        let returned = raw.len();
        let candidates = retain_matching(raw, pattern);

        debug!(
            pattern,
            returned,
            kept = candidates.len(),
            "LLM candidates filtered"
        );

        Ok(candidates)
    }
}

fn build_candidate_prompt(pattern: &str, theme: Option<&str>) -> String {
    let theme_instruction = theme
        .map(|t| THEME_INSTRUCTION_TEMPLATE.replace("{theme}", t))
        .unwrap_or_default();

    CANDIDATE_PROMPT_TEMPLATE
        .replace("{pattern}", pattern)
        .replace("{length}", &pattern.chars().count().to_string())
        .replace("{theme_instruction}", &theme_instruction)
        .replace("{json_instruction}", "Respond with the JSON array only.")
}

/// Drops candidates that do not fit the pattern and trims stray whitespace.
fn retain_matching(candidates: Vec<Candidate>, pattern: &str) -> Vec<Candidate> {
    candidates
        .into_iter()
        .map(|c| Candidate {
            word: c.word.trim().to_string(),
            defs: c.defs,
        })
        .filter(|c| matches_pattern(&c.word, pattern))
        .collect()
}
