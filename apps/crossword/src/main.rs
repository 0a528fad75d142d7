use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crossword::config::{Config, OutputFormat, WordSourceKind};
use crossword::crossword::CrosswordGenerator;
use crossword::llm_client::{self, LlmClient};
use crossword::word_source::{DatamuseWordSource, LlmWordSource, StaticWordSource, WordSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or missing required env vars)
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only the puzzle.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting crossword generator v{}", env!("CARGO_PKG_VERSION"));

    let word_source = build_word_source(&config)?;
    let generator = CrosswordGenerator::new(config.settings, word_source)?;

    let puzzle = generator
        .generate(&config.puzzle_date)
        .await
        .with_context(|| format!("Failed to generate puzzle for {}", config.puzzle_date))?;

    match config.output_format {
        OutputFormat::Text => print!("{}", puzzle.format_for_cli()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&puzzle)?),
    }

    Ok(())
}

/// Constructs the word source selected by `WORD_SOURCE`.
fn build_word_source(config: &Config) -> Result<Arc<dyn WordSource>> {
    let source: Arc<dyn WordSource> = match config.word_source {
        WordSourceKind::Datamuse => {
            info!("Word source: Datamuse ({})", config.datamuse_url);
            Arc::new(
                DatamuseWordSource::new(&config.datamuse_url, config.datamuse_max_results)
                    .context("Failed to build Datamuse client")?,
            )
        }
        WordSourceKind::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the LLM word source")?;
            let llm = LlmClient::new(api_key).context("Failed to build LLM client")?;
            info!("Word source: LLM (model: {})", llm_client::MODEL);
            Arc::new(LlmWordSource::new(llm, config.puzzle_theme.clone()))
        }
        WordSourceKind::Static => {
            let source = StaticWordSource::builtin();
            info!("Word source: built-in list ({} words)", source.len());
            Arc::new(source)
        }
    };

    Ok(source)
}
