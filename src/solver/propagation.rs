//! The propagation loop (spec.md §4.3): drain the job queue, re-solve
//! each line, apply any tightening to the board, and enqueue every
//! crossing line whose possibilities changed.

use log::{debug, trace};

use crate::bitset::ColorSet;
use crate::board::{Direction, Puzzle};
use crate::solver::history::History;
use crate::solver::job_queue::JobQueue;
use crate::solver::line::solve_line;
use crate::solver::Stats;

/// Outcome of draining the queue to quiescence.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PropagationStatus {
    /// The queue emptied with no contradiction.
    Quiescent,
    /// Some cell's possibility set went empty.
    Contradiction,
}

/// Seed every row and every column as a job, highest priority first by
/// clue slack (tighter lines first -- they are more likely to yield new
/// information and are cheaper to re-check).
pub fn seed_all_lines(puzzle: &Puzzle, queue: &mut JobQueue) {
    for direction in [Direction::Row, Direction::Col] {
        for index in 0..puzzle.num_lines(direction) {
            let slack = puzzle.clue(direction, index).slack;
            queue.add(direction, index, -slack);
        }
    }
}

/// Drain `queue` to quiescence, mutating `puzzle` in place and recording
/// every change in `history` (a no-op unless a branch or checkpoint is
/// open). Every cell index whose possibilities actually tightened is
/// appended to `changed`, in the order discovered, for callers that want
/// to narrow a later probing pass to their neighbourhood (spec.md §4.9).
/// Returns [`PropagationStatus::Contradiction`] as soon as a line turns
/// up unsolvable, leaving the queue and board in whatever partial state
/// they reached -- callers that need to keep exploring alternatives are
/// expected to roll back via `history` themselves.
pub fn propagate(
    puzzle: &mut Puzzle,
    queue: &mut JobQueue,
    history: &mut History,
    stats: &mut Stats,
    changed: &mut Vec<usize>,
) -> PropagationStatus {
    while let Some((direction, index)) = queue.next() {
        stats.nlines += 1;
        let clue = puzzle.clue(direction, index).clone();
        let possible = puzzle.line_possible(direction, index);

        let tightened = match solve_line(&clue, &possible) {
            Ok(t) => t,
            Err(_) => {
                debug!("{} {} has no valid placement", direction, index);
                return PropagationStatus::Contradiction;
            }
        };

        let indices = puzzle.line_indices(direction, index);
        for (&cell_idx, (&old, &new)) in indices.iter().zip(possible.iter().zip(tightened.iter()))
        {
            if old == new {
                continue;
            }
            trace!("cell {} {:?} -> {:?}", cell_idx, old, new);
            history.push(cell_idx, old, false, None);
            puzzle.raw_set_possible(cell_idx, new);
            if old.popcount() > 1 && new.popcount() == 1 {
                puzzle.nsolved += 1;
            }
            changed.push(cell_idx);

            let (cross_dir, cross_idx) = puzzle.crossing_line(direction, cell_idx);
            let slack = puzzle.clue(cross_dir, cross_idx).slack;
            queue.add(cross_dir, cross_idx, -slack);
        }
    }
    PropagationStatus::Quiescent
}

/// Last-resort stuck-state eliminator (spec.md §4.5), invoked only once
/// propagation and probing have both stalled with no branch outstanding.
/// For each unsolved cell, tentatively pin it to each remaining colour in
/// turn and re-run line-solving on both crossing lines; a colour whose
/// pinning leaves either line with no valid placement is permanently
/// removed from the cell. Each tentative pin is undone through a
/// checkpoint rather than a branch, since no search alternative is being
/// taken here. Returns the number of colours eliminated -- propagation
/// should resume if this is nonzero.
pub fn exhaustive_line_check(
    puzzle: &mut Puzzle,
    queue: &mut JobQueue,
    history: &mut History,
    stats: &mut Stats,
) -> usize {
    let mut eliminated = 0usize;

    for cell_idx in 0..puzzle.ncells() {
        let possible = puzzle.cell_by_index(cell_idx).possible;
        if possible.popcount() <= 1 {
            continue;
        }

        for color in possible.colors() {
            let checkpoint = history.begin_checkpoint();
            let old = puzzle.cell_by_index(cell_idx).possible;
            history.push(cell_idx, old, false, None);
            puzzle.raw_set_possible(cell_idx, ColorSet::single(color));

            let (row, col) = {
                let cell = puzzle.cell_by_index(cell_idx);
                (cell.row, cell.col)
            };
            let row_clue = puzzle.clue(Direction::Row, row).clone();
            let row_line = puzzle.line_possible(Direction::Row, row);
            let col_clue = puzzle.clue(Direction::Col, col).clone();
            let col_line = puzzle.line_possible(Direction::Col, col);
            stats.nlines += 2;

            let admits =
                solve_line(&row_clue, &row_line).is_ok() && solve_line(&col_clue, &col_line).is_ok();

            history.rollback_to(checkpoint, puzzle);

            if admits {
                continue;
            }

            let current = puzzle.cell_by_index(cell_idx).possible;
            let new = current.difference(ColorSet::single(color));
            if new == current {
                continue;
            }
            history.push(cell_idx, current, false, None);
            puzzle.raw_set_possible(cell_idx, new);
            if current.popcount() > 1 && new.popcount() == 1 {
                puzzle.nsolved += 1;
            }
            let row_slack = puzzle.clue(Direction::Row, row).slack;
            let col_slack = puzzle.clue(Direction::Col, col).slack;
            queue.add(Direction::Row, row, -row_slack);
            queue.add(Direction::Col, col, -col_slack);
            eliminated += 1;
        }
    }

    eliminated
}
