//! Word filling — turns one slot's pattern into a committed answer and clue.
//!
//! Flow per slot: pattern from grid → optional seed letter → word-source lookup
//! → seeded shuffle → first valid, placement-compatible candidate → fallback
//! list if none → commit letters.
//!
//! Across slots must all be filled before any down slot so that down patterns
//! carry the crossing letters.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crossword::grid::Grid;
use crate::crossword::numbering::{Direction, WordSlot};
use crate::crossword::rng::SeededRng;
use crate::crossword::validator::Validator;
use crate::word_source::{WordSource, WILDCARD};

/// Common English letters, repeated by rough frequency. Used to seed an
/// all-wildcard pattern with one concrete letter.
const SEED_LETTERS: &[u8] = b"eeeeeeeaaaaarrrrriiiiiooooottttttnnnnnsssssllllccuudp";

/// Built-in answers by length, used when the word source has nothing that fits.
const FALLBACK_WORDS: &[&[&str]] = &[
    &[],
    &[],
    &["AN", "AT", "IN", "ON", "TO", "IT", "OR", "AS"],
    &["ART", "ERA", "ONE", "TEA", "EAR", "OAT", "RAT", "SEA", "ICE", "NET", "TEN"],
    &["AREA", "EAST", "IRON", "NEAT", "RATE", "SEAT", "TEAR", "ALSO"],
    &["RAILS", "STARE", "ARISE", "TREAT", "ALONE", "IRATE", "SNARE", "ATONE"],
    &["STREAM", "SENIOR", "RETAIN", "TRAINS", "INSERT"],
    &["STATION", "ORATION", "TRAINEE", "RETAINS"],
    &["RELATION", "ROTATION", "ORIENTAL"],
    &["STATIONER", "RELATIONS", "ORIENTATE"],
];

/// Fallback answers for a slot length; empty when the length is unsupported.
pub fn fallback_words(length: usize) -> &'static [&'static str] {
    FALLBACK_WORDS.get(length).copied().unwrap_or(&[])
}

fn generic_clue(length: usize) -> String {
    format!("A common {length}-letter word")
}

// ────────────────────────────────────────────────────────────────────────────
// Outcome types
// ────────────────────────────────────────────────────────────────────────────

/// Where a slot's answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillSource {
    Candidate,
    Fallback,
    /// First fallback word used even though it clashes with crossing letters.
    ForcedFallback,
    Unfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ForcedFallback,
    IntersectionConflict,
    NoFallback,
}

/// A degraded-mode event recorded while filling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillDiagnostic {
    pub number: u32,
    pub direction: Direction,
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOutcome {
    pub source: FillSource,
    pub diagnostics: Vec<FillDiagnostic>,
}

// ────────────────────────────────────────────────────────────────────────────
// Filler
// ────────────────────────────────────────────────────────────────────────────

pub struct WordFiller<'a> {
    source: &'a dyn WordSource,
    validator: &'a dyn Validator,
}

impl<'a> WordFiller<'a> {
    pub fn new(source: &'a dyn WordSource, validator: &'a dyn Validator) -> Self {
        Self { source, validator }
    }

    /// Fills one slot and commits its letters to the grid.
    pub async fn fill_word(
        &self,
        grid: &mut Grid,
        slot: &mut WordSlot,
        rng: &mut SeededRng,
    ) -> FillOutcome {
        let pattern = build_pattern(grid, slot);
        let query = if pattern.chars().all(|c| c == WILDCARD) {
            seed_pattern(&pattern, rng)
        } else {
            pattern.clone()
        };

        let mut candidates = match self.source.lookup(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    number = slot.number,
                    direction = ?slot.direction,
                    "Word source failed for {query:?}, using fallback: {e}"
                );
                Vec::new()
            }
        };

        rng.shuffle(&mut candidates);

        let chosen = candidates
            .iter()
            .find(|c| self.validator.validate(c, slot.length) && fits(grid, slot, &c.word));

        let mut diagnostics = Vec::new();

        let (answer, clue, source) = match chosen {
            Some(candidate) => (
                candidate.word.to_ascii_uppercase(),
                candidate
                    .first_definition()
                    .map(str::to_string)
                    .unwrap_or_else(|| generic_clue(slot.length)),
                FillSource::Candidate,
            ),
            None => {
                let fallbacks = fallback_words(slot.length);
                match fallbacks.iter().find(|w| fits(grid, slot, w)) {
                    Some(word) => (word.to_string(), generic_clue(slot.length), FillSource::Fallback),
                    None => match fallbacks.first() {
                        Some(word) => {
                            let message = format!(
                                "no fallback fits pattern {pattern:?}; forcing {word}"
                            );
                            warn!(number = slot.number, direction = ?slot.direction, "{message}");
                            diagnostics.push(diagnostic(slot, DiagnosticKind::ForcedFallback, message));
                            (word.to_string(), generic_clue(slot.length), FillSource::ForcedFallback)
                        }
                        None => {
                            let message =
                                format!("no fallback words of length {}", slot.length);
                            warn!(number = slot.number, direction = ?slot.direction, "{message}");
                            diagnostics.push(diagnostic(slot, DiagnosticKind::NoFallback, message));
                            return FillOutcome {
                                source: FillSource::Unfilled,
                                diagnostics,
                            };
                        }
                    },
                }
            }
        };

        for (pos, letter) in slot.positions.iter().zip(answer.chars()) {
            let idx = grid.index_of(*pos);
            if let Some(previous) = grid.set_letter(idx, letter) {
                if previous != letter {
                    let message = format!(
                        "overwrote {previous} with {letter} at row {}, col {}",
                        pos.row, pos.col
                    );
                    warn!(number = slot.number, direction = ?slot.direction, "{message}");
                    diagnostics.push(diagnostic(
                        slot,
                        DiagnosticKind::IntersectionConflict,
                        message,
                    ));
                }
            }
        }

        debug!(
            number = slot.number,
            direction = ?slot.direction,
            pattern = %pattern,
            answer = %answer,
            source = ?source,
            "Slot filled"
        );

        slot.answer = answer;
        slot.clue = clue;

        FillOutcome {
            source,
            diagnostics,
        }
    }
}

fn diagnostic(slot: &WordSlot, kind: DiagnosticKind, message: String) -> FillDiagnostic {
    FillDiagnostic {
        number: slot.number,
        direction: slot.direction,
        kind,
        message,
    }
}

/// Known letters (lower-case) and `?` for the slot's cells.
pub fn build_pattern(grid: &Grid, slot: &WordSlot) -> String {
    slot.positions
        .iter()
        .map(|pos| {
            grid.cell(grid.index_of(*pos))
                .letter()
                .map_or(WILDCARD, |c| c.to_ascii_lowercase())
        })
        .collect()
}

/// Replaces one random wildcard with a common letter.
fn seed_pattern(pattern: &str, rng: &mut SeededRng) -> String {
    let mut chars: Vec<char> = pattern.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let position = rng.gen_index(chars.len());
    let letter = SEED_LETTERS[rng.gen_index(SEED_LETTERS.len())] as char;
    chars[position] = letter;
    chars.into_iter().collect()
}

/// True when `word` has the slot's length and agrees with every letter already
/// on the grid.
pub fn fits(grid: &Grid, slot: &WordSlot, word: &str) -> bool {
    word.chars().count() == slot.length
        && slot.positions.iter().zip(word.chars()).all(|(pos, ch)| {
            grid.cell(grid.index_of(*pos))
                .letter()
                .map_or(true, |existing| existing.eq_ignore_ascii_case(&ch))
        })
}
