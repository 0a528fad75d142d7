//! Grid data model — cells stored flat in row-major order.
//!
//! Neighbor relations (`above`, `below`, `prev`, `next`, `opposite`) are index
//! arithmetic over `idx = row * size + col`; cells never point at each other.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::PuzzleError;

/// Largest supported grid edge. The fallback word lists stop at this length.
pub const MAX_GRID_SIZE: usize = 9;

// ────────────────────────────────────────────────────────────────────────────
// Cell
// ────────────────────────────────────────────────────────────────────────────

/// What a cell holds. Serializes as `""`, `"A"` or `"#"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellContents {
    #[default]
    Empty,
    Letter(char),
    Block,
}

impl fmt::Display for CellContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContents::Empty => Ok(()),
            CellContents::Letter(c) => write!(f, "{c}"),
            CellContents::Block => f.write_str("#"),
        }
    }
}

impl Serialize for CellContents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellContents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(CellContents::Empty),
            (Some('#'), None) => Ok(CellContents::Block),
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(CellContents::Letter(c.to_ascii_uppercase()))
            }
            _ => Err(de::Error::custom(format!("invalid cell contents: {raw:?}"))),
        }
    }
}

/// A single grid square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub contents: CellContents,
    pub is_black: bool,
    /// Visible clue number, set the first time either numbering pass reaches the cell.
    pub number: Option<u32>,
    pub across_number: Option<u32>,
    pub down_number: Option<u32>,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            contents: CellContents::Empty,
            is_black: false,
            number: None,
            across_number: None,
            down_number: None,
        }
    }

    pub fn letter(&self) -> Option<char> {
        match self.contents {
            CellContents::Letter(c) => Some(c),
            _ => None,
        }
    }
}

/// Row/column coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Grid
// ────────────────────────────────────────────────────────────────────────────

/// Square grid of cells. Sole owner of every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a `size × size` grid of white, empty cells.
    pub fn new(size: usize) -> Result<Self, PuzzleError> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(PuzzleError::InvalidGridSize(format!(
                "grid size must be between 1 and {MAX_GRID_SIZE}, got {size}"
            )));
        }

        let cells = (0..size * size)
            .map(|idx| Cell::new(idx / size, idx % size))
            .collect();

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn cell_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    pub fn at(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn index_of(&self, pos: Position) -> usize {
        self.index(pos.row, pos.col)
    }

    pub fn position(&self, idx: usize) -> Position {
        Position {
            row: idx / self.size,
            col: idx % self.size,
        }
    }

    pub fn above(&self, idx: usize) -> Option<usize> {
        (idx >= self.size).then(|| idx - self.size)
    }

    pub fn below(&self, idx: usize) -> Option<usize> {
        (idx + self.size < self.cells.len()).then(|| idx + self.size)
    }

    pub fn prev(&self, idx: usize) -> Option<usize> {
        (idx % self.size != 0).then(|| idx - 1)
    }

    pub fn next(&self, idx: usize) -> Option<usize> {
        (idx % self.size != self.size - 1).then(|| idx + 1)
    }

    /// The 180°-rotated partner: `grid[size-1-r][size-1-c]`.
    pub fn opposite(&self, idx: usize) -> usize {
        self.cells.len() - 1 - idx
    }

    /// Orthogonal neighbors in above/below/prev/next order; `None` at edges.
    pub fn neighbors(&self, idx: usize) -> [Option<usize>; 4] {
        [
            self.above(idx),
            self.below(idx),
            self.prev(idx),
            self.next(idx),
        ]
    }

    pub fn is_black(&self, idx: usize) -> bool {
        self.cells[idx].is_black
    }

    pub fn is_white(&self, idx: usize) -> bool {
        !self.cells[idx].is_black
    }

    fn is_white_at(&self, idx: Option<usize>) -> bool {
        idx.is_some_and(|i| self.is_white(i))
    }

    /// Colors one cell. Turning a cell white clears it.
    pub fn set_black(&mut self, idx: usize, black: bool) {
        let cell = &mut self.cells[idx];
        cell.is_black = black;
        cell.contents = if black {
            CellContents::Block
        } else {
            CellContents::Empty
        };
    }

    /// Colors a cell together with its opposite, keeping the grid point-symmetric.
    pub fn set_black_pair(&mut self, idx: usize, black: bool) {
        self.set_black(idx, black);
        let opposite = self.opposite(idx);
        self.set_black(opposite, black);
    }

    /// Writes a letter into a white cell, returning the letter it replaced.
    pub fn set_letter(&mut self, idx: usize, letter: char) -> Option<char> {
        debug_assert!(self.is_white(idx), "letter written into a black cell");
        let cell = &mut self.cells[idx];
        let previous = cell.letter();
        cell.contents = CellContents::Letter(letter.to_ascii_uppercase());
        previous
    }

    pub fn black_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_black).count()
    }

    /// Every black cell's opposite is black.
    pub fn is_symmetric(&self) -> bool {
        (0..self.cells.len()).all(|idx| self.is_black(idx) == self.is_black(self.opposite(idx)))
    }

    /// A white cell whose four orthogonal neighbors are all missing or black.
    /// The lone cell of a 1×1 grid does not count.
    pub fn is_isolated_white(&self, idx: usize) -> bool {
        self.size > 1
            && self.is_white(idx)
            && !self
                .neighbors(idx)
                .into_iter()
                .any(|n| self.is_white_at(n))
    }

    pub fn isolated_whites(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&idx| self.is_isolated_white(idx))
            .collect()
    }

    /// Cell indices of every row followed by every column.
    pub fn lines(&self) -> Vec<Vec<usize>> {
        let rows = (0..self.size).map(|r| (0..self.size).map(|c| self.index(r, c)).collect());
        let cols = (0..self.size).map(|c| (0..self.size).map(|r| self.index(r, c)).collect());
        rows.chain(cols).collect()
    }

    /// Number of maximal runs of exactly two white cells across all rows and columns.
    pub fn two_letter_runs(&self) -> usize {
        self.lines()
            .iter()
            .map(|line| {
                let mut runs = 0;
                let mut current = 0;
                for &idx in line {
                    if self.is_white(idx) {
                        current += 1;
                    } else {
                        if current == 2 {
                            runs += 1;
                        }
                        current = 0;
                    }
                }
                if current == 2 {
                    runs += 1;
                }
                runs
            })
            .sum()
    }

    /// Isolated whites plus two-letter runs.
    pub fn defect_count(&self) -> usize {
        self.isolated_whites().len() + self.two_letter_runs()
    }

    /// White cells in the 3×3 block centred on an interior cell.
    pub fn whites_around(&self, row: usize, col: usize) -> usize {
        (row - 1..=row + 1)
            .flat_map(|r| (col - 1..=col + 1).map(move |c| (r, c)))
            .filter(|&(r, c)| self.is_white(self.index(r, c)))
            .count()
    }

    /// Nested rows for export.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(<[Cell]>::to_vec).collect()
    }

    /// Black/white layout only, for shape comparisons.
    pub fn shape(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.is_black).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell.contents {
                    CellContents::Empty => ".".to_string(),
                    other => other.to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
