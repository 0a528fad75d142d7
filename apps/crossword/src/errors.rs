use thiserror::Error;

/// Errors raised by the puzzle engine.
///
/// Only malformed caller input is a hard error. Word-source trouble never
/// surfaces here: the filler logs it and degrades to the fallback word list.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("Invalid grid size: {0}")]
    InvalidGridSize(String),

    #[error("Invalid black square count: {0}")]
    InvalidBlackCount(String),

    #[error("Invalid puzzle date: {0}")]
    InvalidDate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PuzzleError {
    /// True for errors caused by the caller's input rather than the engine.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, PuzzleError::Internal(_))
    }
}
