//! Word mapping — finds across/down slots and assigns clue numbers.
//!
//! Numbering runs in two full row-major passes sharing one counter: all across
//! starts first, then all down starts. A cell numbered by the across pass keeps
//! that number for its down word too, so down-only starts are numbered after
//! every across start.

use serde::{Deserialize, Serialize};

use crate::crossword::grid::{Grid, Position};

/// Shortest run registered as a word.
pub const MIN_WORD_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Steps one cell forward along this direction.
    fn step(self, grid: &Grid, idx: usize) -> Option<usize> {
        match self {
            Direction::Across => grid.next(idx),
            Direction::Down => grid.below(idx),
        }
    }

    fn step_back(self, grid: &Grid, idx: usize) -> Option<usize> {
        match self {
            Direction::Across => grid.prev(idx),
            Direction::Down => grid.above(idx),
        }
    }
}

/// One across or down run destined to hold a word.
///
/// Once filled, `answer[i]` equals the letter at `positions[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSlot {
    pub number: u32,
    pub direction: Direction,
    pub length: usize,
    pub clue: String,
    pub answer: String,
    pub positions: Vec<Position>,
}

impl WordSlot {
    fn new(number: u32, direction: Direction, positions: Vec<Position>) -> Self {
        Self {
            number,
            direction,
            length: positions.len(),
            clue: String::new(),
            answer: String::new(),
            positions,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.answer.len() == self.length
    }
}

/// All slots of a grid, split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSlots {
    pub across: Vec<WordSlot>,
    pub down: Vec<WordSlot>,
}

impl WordSlots {
    pub fn total(&self) -> usize {
        self.across.len() + self.down.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordSlot> {
        self.across.iter().chain(self.down.iter())
    }
}

/// Numbers the grid and returns its word slots, stopping after `max_words`.
pub fn build_words_and_numbers(grid: &mut Grid, max_words: usize) -> WordSlots {
    for idx in 0..grid.len() {
        let cell = grid.cell_mut(idx);
        cell.number = None;
        cell.across_number = None;
        cell.down_number = None;
    }

    let mut slots = WordSlots::default();
    let mut number_count = 0u32;

    for direction in [Direction::Across, Direction::Down] {
        for idx in 0..grid.len() {
            if slots.total() >= max_words {
                return slots;
            }
            if !starts_word(grid, idx, direction) {
                continue;
            }

            let positions = collect_run(grid, idx, direction);
            let number = match grid.cell(idx).number {
                Some(existing) => existing,
                None => {
                    number_count += 1;
                    grid.cell_mut(idx).number = Some(number_count);
                    number_count
                }
            };

            let cell = grid.cell_mut(idx);
            match direction {
                Direction::Across => cell.across_number = Some(number),
                Direction::Down => cell.down_number = Some(number),
            }

            let slot = WordSlot::new(number, direction, positions);
            match direction {
                Direction::Across => slots.across.push(slot),
                Direction::Down => slots.down.push(slot),
            }
        }
    }

    slots
}

/// A white cell with no white predecessor and a white successor.
fn starts_word(grid: &Grid, idx: usize, direction: Direction) -> bool {
    let white = |i: Option<usize>| i.is_some_and(|i| grid.is_white(i));

    grid.is_white(idx)
        && !white(direction.step_back(grid, idx))
        && white(direction.step(grid, idx))
}

fn collect_run(grid: &Grid, start: usize, direction: Direction) -> Vec<Position> {
    let mut positions = Vec::new();
    let mut current = Some(start);

    while let Some(idx) = current.filter(|&i| grid.is_white(i)) {
        positions.push(grid.position(idx));
        current = direction.step(grid, idx);
    }

    debug_assert!(positions.len() >= MIN_WORD_LENGTH);
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a grid from rows of `.` (white) and `#` (black).
    fn grid_from(rows: &[&str]) -> Grid {
        let mut grid = Grid::new(rows.len()).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if ch == '#' {
                    let idx = grid.index(r, c);
                    grid.set_black(idx, true);
                }
            }
        }
        grid
    }

    #[test]
    fn test_open_grid_numbers_across_then_down() {
        let mut grid = Grid::new(3).unwrap();
        let slots = build_words_and_numbers(&mut grid, 100);

        assert_eq!(slots.across.len(), 3);
        assert_eq!(slots.down.len(), 3);

        let across: Vec<u32> = slots.across.iter().map(|s| s.number).collect();
        assert_eq!(across, vec![1, 2, 3]);

        // (0,0) starts both and keeps 1; (0,1) and (0,2) are down-only and
        // are numbered after every across start.
        let down: Vec<u32> = slots.down.iter().map(|s| s.number).collect();
        assert_eq!(down, vec![1, 4, 5]);

        assert_eq!(grid.at(0, 0).number, Some(1));
        assert_eq!(grid.at(0, 0).across_number, Some(1));
        assert_eq!(grid.at(0, 0).down_number, Some(1));
        assert_eq!(grid.at(1, 0).across_number, Some(2));
        assert_eq!(grid.at(1, 0).down_number, None);
        assert_eq!(grid.at(0, 2).number, Some(5));
        assert_eq!(grid.at(1, 1).number, None);
    }

    #[test]
    fn test_positions_are_ordered_first_to_last() {
        let mut grid = Grid::new(3).unwrap();
        let slots = build_words_and_numbers(&mut grid, 100);

        let first_down = &slots.down[0];
        assert_eq!(first_down.direction, Direction::Down);
        assert_eq!(first_down.length, 3);
        assert_eq!(
            first_down.positions,
            vec![
                Position { row: 0, col: 0 },
                Position { row: 1, col: 0 },
                Position { row: 2, col: 0 },
            ]
        );
    }

    #[test]
    fn test_black_cells_split_runs_and_singles_are_skipped() {
        let mut grid = grid_from(&["...#.", ".....", ".....", ".....", ".#..."]);
        let slots = build_words_and_numbers(&mut grid, 100);

        // Row 0: "..." then a single white after the block.
        let row0: Vec<usize> = slots
            .across
            .iter()
            .filter(|s| s.positions[0].row == 0)
            .map(|s| s.length)
            .collect();
        assert_eq!(row0, vec![3]);

        // Column 3 restarts below the block at (0,3).
        let col3 = slots
            .down
            .iter()
            .find(|s| s.positions[0].col == 3)
            .unwrap();
        assert_eq!(col3.positions[0], Position { row: 1, col: 3 });
        assert_eq!(col3.length, 4);
    }

    #[test]
    fn test_max_words_caps_total() {
        let mut grid = Grid::new(5).unwrap();
        let slots = build_words_and_numbers(&mut grid, 7);
        assert_eq!(slots.total(), 7);
        assert_eq!(slots.across.len(), 5);
        assert_eq!(slots.down.len(), 2);
    }

    #[test]
    fn test_max_words_can_starve_down_pass() {
        let mut grid = Grid::new(5).unwrap();
        let slots = build_words_and_numbers(&mut grid, 3);
        assert_eq!(slots.across.len(), 3);
        assert!(slots.down.is_empty());
        assert!(grid.cells().iter().all(|c| c.down_number.is_none()));
    }

    #[test]
    fn test_numbers_strictly_increase_in_assignment_order() {
        let mut grid = grid_from(&[".....", ".#...", ".....", "...#.", "....."]);
        let slots = build_words_and_numbers(&mut grid, 100);

        let across: Vec<u32> = slots.across.iter().map(|s| s.number).collect();
        assert!(across.windows(2).all(|w| w[0] < w[1]));

        let max_across = across.iter().copied().max().unwrap();
        for slot in &slots.down {
            let start = grid.at(slot.positions[0].row, slot.positions[0].col);
            if start.across_number.is_some() {
                assert_eq!(start.across_number, Some(slot.number));
            } else {
                assert!(slot.number > max_across);
            }
        }
    }

    #[test]
    fn test_renumbering_is_idempotent() {
        let mut grid = Grid::new(4).unwrap();
        let first = build_words_and_numbers(&mut grid, 100);
        let second = build_words_and_numbers(&mut grid, 100);
        assert_eq!(first, second);
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Across).unwrap(),
            r#""across""#
        );
    }
}
