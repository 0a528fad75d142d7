//! Daily crossword generation.
//!
//! `crossword` holds the engine (grid, numbering, filling); `word_source` holds
//! the collaborators it queries for candidate words.

pub mod config;
pub mod crossword;
pub mod errors;
pub mod llm_client;
pub mod word_source;
