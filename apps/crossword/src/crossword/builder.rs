//! Grid construction — symmetric black-square scatter followed by repair passes.
//!
//! Pass order is fixed:
//! scatter → prevent blocked whites → eliminate two-letter words →
//! reduce large blocks → prevent blocked whites.
//!
//! Every pass flips cells in opposite pairs, so 180° symmetry holds throughout.

use tracing::{debug, warn};

use crate::crossword::grid::Grid;
use crate::crossword::rng::SeededRng;
use crate::errors::PuzzleError;

/// Chance that a scanned white cell turns black during the scatter.
pub const BLACK_SQUARE_PROBABILITY: f64 = 0.3;

/// Largest white count tolerated in a 3×3 block.
const MAX_WHITES_PER_BLOCK: usize = 7;

/// Most black cells the scatter can place: both halves of the top `size/2` rows.
pub fn max_black_squares(size: usize) -> usize {
    2 * (size / 2) * size
}

/// Builds a repaired, symmetric grid.
pub fn build_grid(
    size: usize,
    target_black_count: usize,
    rng: &mut SeededRng,
) -> Result<Grid, PuzzleError> {
    let mut grid = Grid::new(size)?;

    let placed = populate_black_squares(&mut grid, target_black_count, rng)?;
    let unblocked = prevent_blocked_white_squares(&mut grid, rng);
    let rounds = eliminate_two_letter_words(&mut grid);
    let blocked = reduce_large_blocks(&mut grid);
    let unblocked_again = prevent_blocked_white_squares(&mut grid, rng);

    debug!(
        placed,
        unblocked,
        rounds,
        blocked,
        unblocked_again,
        black = grid.black_count(),
        "Grid built"
    );

    if grid.size() >= 3 && grid.defect_count() > 0 {
        warn!(
            defects = grid.defect_count(),
            "Grid repair left defects uncorrected"
        );
    }

    Ok(grid)
}

// ────────────────────────────────────────────────────────────────────────────
// Scatter
// ────────────────────────────────────────────────────────────────────────────

/// Scatters black squares in symmetric pairs over the top half of the grid
/// until `target_black_count` cells are black. Returns the number placed.
pub fn populate_black_squares(
    grid: &mut Grid,
    target_black_count: usize,
    rng: &mut SeededRng,
) -> Result<usize, PuzzleError> {
    let capacity = max_black_squares(grid.size());
    if target_black_count > capacity {
        return Err(PuzzleError::InvalidBlackCount(format!(
            "a {size}x{size} grid can hold at most {capacity} scattered black squares, requested {target_black_count}",
            size = grid.size()
        )));
    }

    let half_rows = grid.size() / 2;
    let scan_end = half_rows * grid.size();
    let mut count = 0;

    'scan: while count < target_black_count {
        if (0..scan_end).all(|idx| grid.is_black(idx)) {
            // Only reachable when the caller pre-blackened the grid.
            break;
        }

        for row in 0..half_rows {
            for col in 0..grid.size() {
                if count >= target_black_count {
                    break 'scan;
                }
                let idx = grid.index(row, col);
                if grid.is_black(idx) {
                    continue;
                }
                if rng.next_f64() < BLACK_SQUARE_PROBABILITY {
                    grid.set_black_pair(idx, true);
                    count += 2;
                }
            }
        }
    }

    Ok(count)
}

// ────────────────────────────────────────────────────────────────────────────
// Repairs
// ────────────────────────────────────────────────────────────────────────────

/// Opens one random black neighbor (and its opposite) around every white cell
/// that has no white neighbor. Returns the number of cells repaired.
pub fn prevent_blocked_white_squares(grid: &mut Grid, rng: &mut SeededRng) -> usize {
    let mut repaired = 0;

    for idx in 0..grid.len() {
        if !grid.is_isolated_white(idx) {
            continue;
        }

        let black_neighbors: Vec<usize> = grid
            .neighbors(idx)
            .into_iter()
            .flatten()
            .filter(|&n| grid.is_black(n))
            .collect();

        if black_neighbors.is_empty() {
            continue;
        }

        let pick = black_neighbors[rng.gen_index(black_neighbors.len())];
        grid.set_black_pair(pick, false);
        repaired += 1;
    }

    repaired
}

/// Clears the black cell closing off any run of exactly two whites, sweeping
/// rows both ways and columns both ways. Rounds repeat until one clears
/// nothing; returns the number of rounds.
///
/// Each productive round removes at least one black cell, so the loop ends
/// within `grid.len() + 1` rounds.
pub fn eliminate_two_letter_words(grid: &mut Grid) -> usize {
    let lines = grid.lines();
    let max_rounds = grid.len() + 1;
    let mut rounds = 0;

    loop {
        rounds += 1;
        let mut cleared = 0;

        for line in &lines {
            cleared += sweep_line(grid, line.iter().copied());
            cleared += sweep_line(grid, line.iter().rev().copied());
        }

        if cleared == 0 {
            break;
        }
        if rounds >= max_rounds {
            warn!(rounds, "Two-letter elimination hit its round limit");
            break;
        }
    }

    rounds
}

fn sweep_line(grid: &mut Grid, line: impl Iterator<Item = usize>) -> usize {
    let mut whites = 0;
    let mut cleared = 0;

    for idx in line {
        if grid.is_white(idx) {
            whites += 1;
        } else if whites == 2 {
            grid.set_black_pair(idx, false);
            cleared += 1;
            // The cleared cell extends the run past two.
            whites = 3;
        } else {
            whites = 0;
        }
    }

    cleared
}

/// Blackens the center (and opposite) of any interior 3×3 block holding more
/// than seven whites. A flip that would add isolated whites or two-letter runs
/// is reverted and the block is left open. Returns the number of flips kept.
pub fn reduce_large_blocks(grid: &mut Grid) -> usize {
    let size = grid.size();
    if size < 3 {
        return 0;
    }

    let mut flips = 0;

    for row in 1..size - 1 {
        for col in 1..size - 1 {
            let center = grid.index(row, col);
            if grid.is_black(center) || grid.whites_around(row, col) <= MAX_WHITES_PER_BLOCK {
                continue;
            }

            let before = grid.defect_count();
            grid.set_black_pair(center, true);

            if grid.defect_count() > before {
                grid.set_black_pair(center, false);
                debug!(row, col, "Skipped block reduction that would add defects");
            } else {
                flips += 1;
            }
        }
    }

    flips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(count: usize) -> Vec<String> {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|offset| {
                (start + chrono::Duration::days(offset as i64))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_scatter_places_exact_even_target_symmetrically() {
        let mut grid = Grid::new(5).unwrap();
        let mut rng = SeededRng::from_date("2024-01-01");
        let placed = populate_black_squares(&mut grid, 6, &mut rng).unwrap();
        assert_eq!(placed, 6);
        assert_eq!(grid.black_count(), 6);
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_scatter_never_touches_middle_row_of_odd_grid() {
        for date in dates(50) {
            let mut grid = Grid::new(5).unwrap();
            let mut rng = SeededRng::from_date(&date);
            populate_black_squares(&mut grid, 10, &mut rng).unwrap();
            assert!((0..5).all(|c| !grid.at(2, c).is_black), "date {date}");
        }
    }

    #[test]
    fn test_scatter_rejects_unreachable_target() {
        let mut grid = Grid::new(5).unwrap();
        let mut rng = SeededRng::new(1);
        assert_eq!(max_black_squares(5), 20);
        let err = populate_black_squares(&mut grid, 21, &mut rng).unwrap_err();
        assert!(matches!(err, PuzzleError::InvalidBlackCount(_)));
    }

    #[test]
    fn test_scatter_zero_target_is_noop() {
        let mut grid = Grid::new(5).unwrap();
        let mut rng = SeededRng::new(7);
        assert_eq!(populate_black_squares(&mut grid, 0, &mut rng).unwrap(), 0);
        assert_eq!(grid.black_count(), 0);
    }

    #[test]
    fn test_prevent_blocked_whites_opens_a_neighbor() {
        let mut grid = Grid::new(5).unwrap();
        // Box in the top-left corner symmetrically.
        grid.set_black_pair(grid.index(0, 1), true);
        grid.set_black_pair(grid.index(1, 0), true);
        assert_eq!(grid.isolated_whites().len(), 2);

        let mut rng = SeededRng::from_date("2024-01-01");
        let repaired = prevent_blocked_white_squares(&mut grid, &mut rng);

        assert!(repaired >= 1);
        assert!(grid.isolated_whites().is_empty());
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_eliminate_clears_black_after_two_whites() {
        let mut grid = Grid::new(5).unwrap();
        // Row 0: W W # W W, mirrored onto row 4.
        grid.set_black_pair(grid.index(0, 2), true);
        assert!(grid.two_letter_runs() > 0);

        eliminate_two_letter_words(&mut grid);

        assert_eq!(grid.two_letter_runs(), 0);
        assert!(!grid.at(0, 2).is_black);
        assert!(!grid.at(4, 2).is_black);
    }

    #[test]
    fn test_eliminate_leaves_longer_runs_alone() {
        let mut grid = Grid::new(5).unwrap();
        // Row 0: W W W # W -> a run of three and a single; nothing to clear.
        grid.set_black_pair(grid.index(0, 3), true);
        let rounds = eliminate_two_letter_words(&mut grid);
        assert_eq!(rounds, 1);
        assert!(grid.at(0, 3).is_black);
    }

    #[test]
    fn test_reduce_large_blocks_breaks_open_interior() {
        let mut grid = Grid::new(7).unwrap();
        let flips = reduce_large_blocks(&mut grid);
        assert!(flips > 0);
        assert!(grid.is_symmetric());
        assert_eq!(grid.defect_count(), 0);
    }

    #[test]
    fn test_reduce_large_blocks_reverts_unsafe_flip() {
        // After (1,1) goes black, blackening (1,2) would leave "W # # W W".
        let mut grid = Grid::new(5).unwrap();
        reduce_large_blocks(&mut grid);
        assert!(grid.at(1, 1).is_black);
        assert!(!grid.at(1, 2).is_black);
        assert_eq!(grid.defect_count(), 0);
        assert!(grid.is_symmetric());
    }

    #[test]
    fn test_build_grid_holds_invariants_across_a_year() {
        for date in dates(366) {
            let mut rng = SeededRng::from_date(&date);
            let grid = build_grid(5, 6, &mut rng).unwrap();
            assert!(grid.is_symmetric(), "asymmetric grid for {date}");
            assert!(grid.isolated_whites().is_empty(), "isolated white for {date}");
            assert_eq!(grid.two_letter_runs(), 0, "two-letter run for {date}");
        }
    }

    #[test]
    fn test_two_letter_elimination_terminates_quickly() {
        for date in dates(366) {
            let mut grid = Grid::new(5).unwrap();
            let mut rng = SeededRng::from_date(&date);
            populate_black_squares(&mut grid, 6, &mut rng).unwrap();
            prevent_blocked_white_squares(&mut grid, &mut rng);
            let rounds = eliminate_two_letter_words(&mut grid);
            assert!(rounds <= 8, "{rounds} rounds for {date}");
        }
    }

    #[test]
    fn test_build_grid_shape_is_deterministic() {
        let mut first = SeededRng::from_date("2024-01-01");
        let mut second = SeededRng::from_date("2024-01-01");
        let a = build_grid(5, 6, &mut first).unwrap();
        let b = build_grid(5, 6, &mut second).unwrap();
        assert_eq!(a.shape(), b.shape());
    }

    #[test]
    fn test_build_grid_supports_larger_sizes() {
        for date in dates(30) {
            let mut rng = SeededRng::from_date(&date);
            let grid = build_grid(9, 16, &mut rng).unwrap();
            assert!(grid.is_symmetric());
            assert!(grid.isolated_whites().is_empty());
            assert_eq!(grid.two_letter_runs(), 0);
        }
    }
}
