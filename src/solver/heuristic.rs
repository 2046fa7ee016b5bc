//! Heuristics for choosing which cell to guess and which colour to try
//! first (spec.md §4.10), once propagation alone has stalled.

use crate::bitset::ColorId;
use crate::board::{Clue, Direction, Puzzle};
use crate::solver::config::{ColourPolicy, RatingPolicy};

/// Count of this cell's four orthogonal neighbours that are either
/// already solved or off the edge of the board -- spec.md §4.10's
/// primary cell-selection criterion. An off-board neighbour counts as
/// solved, since there is nothing left there to constrain the guess.
fn solved_or_edge_neighbour_count(puzzle: &Puzzle, cell_idx: usize) -> u32 {
    let cell = puzzle.cell_by_index(cell_idx);
    let up = match cell.row.checked_sub(1) {
        Some(r) => puzzle.cell(r, cell.col).is_solved(),
        None => true,
    };
    let down = if cell.row + 1 < puzzle.height {
        puzzle.cell(cell.row + 1, cell.col).is_solved()
    } else {
        true
    };
    let left = match cell.col.checked_sub(1) {
        Some(c) => puzzle.cell(cell.row, c).is_solved(),
        None => true,
    };
    let right = if cell.col + 1 < puzzle.width {
        puzzle.cell(cell.row, cell.col + 1).is_solved()
    } else {
        true
    };
    u32::from(up) + u32::from(down) + u32::from(left) + u32::from(right)
}

/// `slack + 2 * run count` for one direction's clue, the common
/// ingredient of both the `AdHoc` and `Math` ratings.
fn adhoc_s(clue: &Clue) -> i64 {
    clue.slack.max(0) as i64 + 2 * clue.runs.len() as i64
}

/// `ln(n! / (k! (n-k)!))` computed as a running sum, to avoid a
/// factorial/gamma-function dependency for a single log-binomial.
fn log_choose(n: u64, k: u64) -> f64 {
    if k == 0 || k == n {
        return 0.0;
    }
    (1..=k).map(|i| ((n - k + i) as f64).ln() - (i as f64).ln()).sum()
}

/// `ln C(slack + runs, runs)`: roughly how many ways this line's runs
/// could still be laid out, in log space.
fn log_binomial(clue: &Clue) -> f64 {
    let n = clue.slack.max(0) as u64 + clue.runs.len() as u64;
    let k = clue.runs.len() as u64;
    log_choose(n, k)
}

/// Lower is a better (more constraining) guess. `Simple` rates every
/// cell equally, deferring entirely to the neighbour-count criterion in
/// [`choose_cell`].
fn rate_cell(puzzle: &Puzzle, cell_idx: usize, policy: RatingPolicy) -> f64 {
    match policy {
        RatingPolicy::Simple => 0.0,
        RatingPolicy::AdHoc | RatingPolicy::Math => {
            let cell = puzzle.cell_by_index(cell_idx);
            let row_clue = puzzle.clue(Direction::Row, cell.row);
            let col_clue = puzzle.clue(Direction::Col, cell.col);
            match policy {
                RatingPolicy::AdHoc => {
                    let s_row = adhoc_s(row_clue);
                    let s_col = adhoc_s(col_clue);
                    let (lo, hi) = if s_row < s_col {
                        (s_row, s_col)
                    } else {
                        (s_col, s_row)
                    };
                    (3 * lo + hi) as f64
                }
                RatingPolicy::Math => log_binomial(row_clue).min(log_binomial(col_clue)),
                RatingPolicy::Simple => unreachable!(),
            }
        }
    }
}

/// Pick the unsolved cell with the most solved-or-edge neighbours, ties
/// broken by the lowest rating under `policy` (spec.md §4.10). A cell
/// whose neighbour count reaches `2 * n` (every neighbour accounted for,
/// relative to how many colours are still live here) is returned
/// immediately as an obviously good guess, skipping the rest of the
/// board. `None` if every cell is already solved.
pub fn choose_cell(puzzle: &Puzzle, policy: RatingPolicy) -> Option<usize> {
    let mut best: Option<(usize, u32, f64)> = None;
    for idx in 0..puzzle.ncells() {
        let cell = puzzle.cell_by_index(idx);
        if cell.is_solved() {
            continue;
        }
        let neighbours = solved_or_edge_neighbour_count(puzzle, idx);
        if neighbours == 2 * cell.n() {
            return Some(idx);
        }
        let rating = rate_cell(puzzle, idx, policy);
        best = match best {
            None => Some((idx, neighbours, rating)),
            Some((_, best_n, best_r))
                if neighbours > best_n || (neighbours == best_n && rating < best_r) =>
            {
                Some((idx, neighbours, rating))
            }
            other => other,
        };
    }
    best.map(|(idx, _, _)| idx)
}

fn global_color_counts(puzzle: &Puzzle) -> Vec<u32> {
    let mut counts = vec![0u32; puzzle.ncolors as usize];
    for idx in 0..puzzle.ncells() {
        for color in puzzle.cell_by_index(idx).possible.colors() {
            if let Some(slot) = counts.get_mut(color as usize) {
                *slot += 1;
            }
        }
    }
    counts
}

fn neighbor_colors(puzzle: &Puzzle, cell_idx: usize) -> Vec<ColorId> {
    let cell = puzzle.cell_by_index(cell_idx);
    let mut offsets = Vec::with_capacity(4);
    if cell.row > 0 {
        offsets.push((cell.row - 1, cell.col));
    }
    if cell.row + 1 < puzzle.height {
        offsets.push((cell.row + 1, cell.col));
    }
    if cell.col > 0 {
        offsets.push((cell.row, cell.col - 1));
    }
    if cell.col + 1 < puzzle.width {
        offsets.push((cell.row, cell.col + 1));
    }
    offsets
        .into_iter()
        .filter_map(|(r, c)| puzzle.cell(r, c).color())
        .collect()
}

/// A tiny deterministic xorshift, so "random" colour choice stays
/// reproducible across a run without pulling in a dependency the solver
/// otherwise has no use for.
fn xorshift(seed: &mut u64) -> u64 {
    *seed ^= *seed << 13;
    *seed ^= *seed >> 7;
    *seed ^= *seed << 17;
    *seed
}

/// Pick a colour for `cell_idx` under `policy`. `seed` is advanced in
/// place and only consulted by [`ColourPolicy::Random`].
pub fn choose_color(puzzle: &Puzzle, cell_idx: usize, policy: ColourPolicy, seed: &mut u64) -> ColorId {
    let cell = puzzle.cell_by_index(cell_idx);
    let candidates: Vec<ColorId> = cell.possible.colors().collect();
    debug_assert!(!candidates.is_empty());

    match policy {
        ColourPolicy::Max | ColourPolicy::Min => {
            let counts = global_color_counts(puzzle);
            let pick = |best: fn(u32, u32) -> bool| {
                candidates
                    .iter()
                    .copied()
                    .fold(None, |acc: Option<(ColorId, u32)>, c| {
                        let count = counts[c as usize];
                        match acc {
                            None => Some((c, count)),
                            Some((_, best_count)) if best(count, best_count) => Some((c, count)),
                            other => other,
                        }
                    })
                    .map(|(c, _)| c)
                    .unwrap_or(candidates[0])
            };
            match policy {
                ColourPolicy::Max => pick(|a, b| a > b),
                ColourPolicy::Min => pick(|a, b| a < b),
                _ => unreachable!(),
            }
        }
        ColourPolicy::Random => {
            let roll = xorshift(seed) as usize % candidates.len();
            candidates[roll]
        }
        ColourPolicy::Contrast => {
            let neighbors = neighbor_colors(puzzle, cell_idx);
            candidates
                .iter()
                .copied()
                .min_by_key(|&c| neighbors.iter().filter(|&&n| n == c).count())
                .unwrap_or(candidates[0])
        }
    }
}
