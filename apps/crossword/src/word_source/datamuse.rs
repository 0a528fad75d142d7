//! Dictionary word source backed by the Datamuse API.
//!
//! `GET {base}/words?sp={pattern}&md=d&max={n}`: `?` in `sp` matches exactly
//! one letter and `md=d` asks for definitions (`"n\t..."`).

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::word_source::{Candidate, WordSource, WordSourceError};

pub const DEFAULT_BASE_URL: &str = "https://api.datamuse.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct DatamuseWordSource {
    client: Client,
    base_url: String,
    max_results: u32,
}

impl DatamuseWordSource {
    pub fn new(base_url: impl Into<String>, max_results: u32) -> Result<Self, WordSourceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
        })
    }

    fn words_url(&self) -> String {
        format!("{}/words", self.base_url)
    }

    fn query_params(&self, pattern: &str) -> [(&'static str, String); 3] {
        [
            ("sp", pattern.to_string()),
            ("md", "d".to_string()),
            ("max", self.max_results.to_string()),
        ]
    }
}

#[async_trait]
impl WordSource for DatamuseWordSource {
    async fn lookup(&self, pattern: &str) -> Result<Vec<Candidate>, WordSourceError> {
        let response = self
            .client
            .get(self.words_url())
            .query(&self.query_params(pattern))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WordSourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let candidates: Vec<Candidate> = response.json().await?;
        debug!(pattern, results = candidates.len(), "Datamuse lookup");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_url_trims_trailing_slash() {
        let source = DatamuseWordSource::new("https://api.datamuse.com/", 25).unwrap();
        assert_eq!(source.words_url(), "https://api.datamuse.com/words");
    }

    #[test]
    fn test_query_params_carry_pattern_and_limit() {
        let source = DatamuseWordSource::new(DEFAULT_BASE_URL, 25).unwrap();
        let params = source.query_params("r??ls");
        assert_eq!(params[0], ("sp", "r??ls".to_string()));
        assert_eq!(params[1], ("md", "d".to_string()));
        assert_eq!(params[2], ("max", "25".to_string()));
    }

    #[test]
    fn test_response_body_parses_into_candidates() {
        let body = r#"[
            {"word": "rails", "score": 1612, "defs": ["n\tA bar extending horizontally", "v\tComplain bitterly"]},
            {"word": "roils", "score": 300}
        ]"#;
        let candidates: Vec<Candidate> = serde_json::from_str(body).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[0].first_definition(),
            Some("A bar extending horizontally")
        );
        assert!(candidates[1].defs.is_empty());
    }
}
