use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::crossword::generator::{parse_puzzle_date, DATE_FORMAT};
use crate::crossword::GeneratorSettings;
use crate::word_source::datamuse::DEFAULT_BASE_URL;

/// Which collaborator supplies candidate words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSourceKind {
    Datamuse,
    Llm,
    Static,
}

impl FromStr for WordSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datamuse" => Ok(Self::Datamuse),
            "llm" => Ok(Self::Llm),
            "static" => Ok(Self::Static),
            other => Err(anyhow!(
                "unknown word source '{other}' (expected datamuse, llm or static)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

/// Generator configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub puzzle_date: String,
    pub settings: GeneratorSettings,
    pub word_source: WordSourceKind,
    pub datamuse_url: String,
    pub datamuse_max_results: u32,
    /// Required only when `word_source` is `Llm`.
    pub anthropic_api_key: Option<String>,
    pub puzzle_theme: Option<String>,
    pub output_format: OutputFormat,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = GeneratorSettings::default();

        let puzzle_date = match get("PUZZLE_DATE") {
            Some(date) => {
                parse_puzzle_date(&date).context("PUZZLE_DATE must be YYYY-MM-DD")?;
                date
            }
            None => chrono::Local::now().format(DATE_FORMAT).to_string(),
        };

        let settings = GeneratorSettings {
            grid_size: parse_or(&get, "GRID_SIZE", defaults.grid_size)?,
            target_black_count: parse_or(&get, "TARGET_BLACK_COUNT", defaults.target_black_count)?,
            max_words: parse_or(&get, "MAX_WORDS", defaults.max_words)?,
        };
        settings
            .validate()
            .context("Invalid puzzle settings in environment")?;

        let word_source: WordSourceKind = parse_or(&get, "WORD_SOURCE", WordSourceKind::Datamuse)?;
        let anthropic_api_key = get("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if word_source == WordSourceKind::Llm && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set (WORD_SOURCE=llm)");
        }

        Ok(Config {
            puzzle_date,
            settings,
            word_source,
            datamuse_url: get("DATAMUSE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            datamuse_max_results: parse_or(&get, "DATAMUSE_MAX_RESULTS", 50)?,
            anthropic_api_key,
            puzzle_theme: get("PUZZLE_THEME"),
            output_format: parse_or(&get, "OUTPUT_FORMAT", OutputFormat::Text)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.settings, GeneratorSettings::default());
        assert_eq!(config.word_source, WordSourceKind::Datamuse);
        assert_eq!(config.datamuse_url, DEFAULT_BASE_URL);
        assert_eq!(config.datamuse_max_results, 50);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.rust_log, "info");
        assert!(parse_puzzle_date(&config.puzzle_date).is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PUZZLE_DATE", "2024-01-01"),
            ("GRID_SIZE", "7"),
            ("TARGET_BLACK_COUNT", "10"),
            ("MAX_WORDS", "20"),
            ("WORD_SOURCE", "Static"),
            ("OUTPUT_FORMAT", "json"),
            ("PUZZLE_THEME", "Rail strike ends"),
        ]))
        .unwrap();

        assert_eq!(config.puzzle_date, "2024-01-01");
        assert_eq!(config.settings.grid_size, 7);
        assert_eq!(config.settings.target_black_count, 10);
        assert_eq!(config.settings.max_words, 20);
        assert_eq!(config.word_source, WordSourceKind::Static);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.puzzle_theme.as_deref(), Some("Rail strike ends"));
    }

    #[test]
    fn test_rejects_non_integer_grid_size() {
        let err = Config::from_lookup(lookup(&[("GRID_SIZE", "five")])).unwrap_err();
        assert!(err.to_string().contains("GRID_SIZE"));
    }

    #[test]
    fn test_rejects_negative_black_count() {
        assert!(Config::from_lookup(lookup(&[("TARGET_BLACK_COUNT", "-2")])).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_settings() {
        assert!(Config::from_lookup(lookup(&[("GRID_SIZE", "12")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TARGET_BLACK_COUNT", "40")])).is_err());
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Config::from_lookup(lookup(&[("PUZZLE_DATE", "2024/01/01")])).is_err());
    }

    #[test]
    fn test_llm_source_requires_api_key() {
        assert!(Config::from_lookup(lookup(&[("WORD_SOURCE", "llm")])).is_err());

        let config = Config::from_lookup(lookup(&[
            ("WORD_SOURCE", "llm"),
            ("ANTHROPIC_API_KEY", "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_unknown_word_source() {
        let err = Config::from_lookup(lookup(&[("WORD_SOURCE", "oracle")])).unwrap_err();
        assert!(err.to_string().contains("WORD_SOURCE"));
    }
}
