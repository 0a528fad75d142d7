//! Crossword Generator — orchestrates one puzzle generation.
//!
//! Flow: seed RNG from date → build grid → number slots →
//!       fill all across slots → fill all down slots → assemble `Puzzle`.
//!
//! Each call owns its RNG, so one generator can serve concurrent calls.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::crossword::builder::{build_grid, max_black_squares};
use crate::crossword::filler::{DiagnosticKind, FillDiagnostic, FillSource, WordFiller};
use crate::crossword::grid::{Cell, CellContents, Grid, MAX_GRID_SIZE};
use crate::crossword::numbering::{build_words_and_numbers, WordSlot, WordSlots};
use crate::crossword::rng::SeededRng;
use crate::crossword::validator::{DictionaryValidator, Validator};
use crate::errors::PuzzleError;
use crate::word_source::WordSource;

/// Date format used for seeding and for the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub grid_size: usize,
    /// Black squares scattered before repairs. Should be even: squares are placed in pairs.
    pub target_black_count: usize,
    pub max_words: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            grid_size: 5,
            target_black_count: 6,
            max_words: 10,
        }
    }
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(PuzzleError::InvalidGridSize(format!(
                "grid size must be between 1 and {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }

        let capacity = max_black_squares(self.grid_size);
        if self.target_black_count > capacity {
            return Err(PuzzleError::InvalidBlackCount(format!(
                "target {} exceeds the {capacity} squares a {size}x{size} grid can scatter",
                self.target_black_count,
                size = self.grid_size
            )));
        }

        if self.max_words == 0 {
            return Err(PuzzleError::Validation(
                "max_words must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` puzzle date.
pub fn parse_puzzle_date(date: &str) -> Result<NaiveDate, PuzzleError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| PuzzleError::InvalidDate(format!("{date:?} is not YYYY-MM-DD: {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub number: u32,
    pub text: String,
    pub length: usize,
}

impl From<&WordSlot> for Clue {
    fn from(slot: &WordSlot) -> Self {
        Self {
            number: slot.number,
            text: slot.clue.clone(),
            length: slot.length,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub across: Vec<Clue>,
    pub down: Vec<Clue>,
}

/// A finished puzzle. `solution[r][c]` mirrors `grid[r][c].contents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub date: String,
    pub grid: Vec<Vec<Cell>>,
    pub solution: Vec<Vec<String>>,
    pub clues: Clues,
    pub words: WordSlots,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FillDiagnostic>,
}

impl Puzzle {
    fn assemble(
        date: &str,
        grid: &Grid,
        words: WordSlots,
        diagnostics: Vec<FillDiagnostic>,
    ) -> Self {
        let rows = grid.to_rows();
        let solution = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.contents.to_string()).collect())
            .collect();
        let clues = Clues {
            across: words.across.iter().map(Clue::from).collect(),
            down: words.down.iter().map(Clue::from).collect(),
        };

        Self {
            date: date.to_string(),
            grid: rows,
            solution,
            clues,
            words,
            diagnostics,
        }
    }

    /// True when no white cell is left empty.
    pub fn is_complete(&self) -> bool {
        self.grid
            .iter()
            .flatten()
            .all(|cell| cell.is_black || cell.contents != CellContents::Empty)
    }

    /// True when some commit overwrote a crossing letter.
    pub fn has_conflicts(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::IntersectionConflict)
    }

    /// Plain-text rendering: solution grid followed by numbered clues.
    pub fn format_for_cli(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Daily crossword for {}", self.date);
        out.push('\n');

        for row in &self.grid {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell.contents {
                    CellContents::Empty => ".".to_string(),
                    other => other.to_string(),
                })
                .collect();
            let _ = writeln!(out, "  {}", line.join(" "));
        }

        for (heading, clues) in [("Across", &self.clues.across), ("Down", &self.clues.down)] {
            let _ = writeln!(out, "\n{heading}");
            for clue in clues {
                let _ = writeln!(out, "  {:>2}. {} ({})", clue.number, clue.text, clue.length);
            }
        }

        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct CrosswordGenerator {
    settings: GeneratorSettings,
    word_source: Arc<dyn WordSource>,
    validator: Arc<dyn Validator>,
}

impl CrosswordGenerator {
    /// Validates settings up front so `generate` only fails on a bad date.
    pub fn new(
        settings: GeneratorSettings,
        word_source: Arc<dyn WordSource>,
    ) -> Result<Self, PuzzleError> {
        settings.validate()?;
        Ok(Self {
            settings,
            word_source,
            validator: Arc::new(DictionaryValidator::default()),
        })
    }

    /// Swaps the candidate validator.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Builds only the grid shape for a date. Same date, same shape.
    pub fn build_grid(&self, date: &str) -> Result<Grid, PuzzleError> {
        parse_puzzle_date(date)?;
        let mut rng = SeededRng::from_date(date);
        build_grid(
            self.settings.grid_size,
            self.settings.target_black_count,
            &mut rng,
        )
    }

    /// Generates the full puzzle for `date` (`YYYY-MM-DD`).
    ///
    /// Word-source failures degrade to fallback words; only an invalid date
    /// is an error here.
    pub async fn generate(&self, date: &str) -> Result<Puzzle, PuzzleError> {
        parse_puzzle_date(date)?;
        info!(
            date,
            size = self.settings.grid_size,
            target_black = self.settings.target_black_count,
            "Generating puzzle"
        );

        let mut rng = SeededRng::from_date(date);
        let mut grid = build_grid(
            self.settings.grid_size,
            self.settings.target_black_count,
            &mut rng,
        )?;

        let mut words = build_words_and_numbers(&mut grid, self.settings.max_words);
        info!(
            across = words.across.len(),
            down = words.down.len(),
            black = grid.black_count(),
            "Grid mapped"
        );

        let filler = WordFiller::new(self.word_source.as_ref(), self.validator.as_ref());
        let mut diagnostics = Vec::new();
        let mut fallback_count = 0usize;

        // Across first: down patterns depend on the committed across letters.
        for slot in words.across.iter_mut().chain(words.down.iter_mut()) {
            let outcome = filler.fill_word(&mut grid, slot, &mut rng).await;
            if outcome.source != FillSource::Candidate {
                fallback_count += 1;
            }
            diagnostics.extend(outcome.diagnostics);
        }

        let puzzle = Puzzle::assemble(date, &grid, words, diagnostics);

        if !puzzle.diagnostics.is_empty() {
            warn!(
                date,
                diagnostics = puzzle.diagnostics.len(),
                "Puzzle generated in degraded mode"
            );
        }
        info!(
            date,
            words = puzzle.words.total(),
            fallbacks = fallback_count,
            "Puzzle generated"
        );

        Ok(puzzle)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
