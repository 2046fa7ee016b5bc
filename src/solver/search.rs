//! The top-level search driver (spec.md §4.8): propagate, probe, and
//! only then guess-and-backtrack, modeled as an explicit loop rather
//! than hidden inside recursion-as-control-flow.
//!
//! Conceptually each call below is one state of a
//! Propagate -> Stuck -> (Exhaust | ProbeSequence | HeuristicGuess) ->
//! Backtrack state machine (spec.md §4.8); the states are realized as
//! plain function calls and recursion rather than a literal enum
//! dispatch loop, since Rust's call stack already gives us the "resume
//! where we left off on backtrack" behavior the state machine needs.

use std::time::Instant;

use log::info;

use crate::bitset::ColorSet;
use crate::board::Puzzle;
use crate::solver::config::SolverConfig;
use crate::solver::heuristic::{choose_cell, choose_color};
use crate::solver::history::History;
use crate::solver::job_queue::JobQueue;
use crate::solver::merge::ProbePad;
use crate::solver::probing::{enqueue_affected, is_redundant, probe_candidates, probe_cell, ProbeOutcome};
use crate::solver::propagation::{exhaustive_line_check, propagate, seed_all_lines, PropagationStatus};
use crate::solver::Stats;

/// Failure modes the search can end in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveError {
    /// No assignment satisfies every clue.
    Contradiction,
    /// Propagation quiesced without finishing and `allow_backtrack` is
    /// off, so the search cannot proceed further.
    Stalled,
    /// `timeout_ms` elapsed before the search finished.
    Timeout,
    /// `max_depth` was reached before the search finished.
    DepthExceeded,
}

/// How many complete, clue-satisfying solutions the search found.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveStatus {
    NoSolution,
    Unique,
    Multiple,
}

#[derive(Debug)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub stats: Stats,
}

struct SearchCtx<'a> {
    config: &'a SolverConfig,
    start: Instant,
    seed: u64,
    solutions: u32,
    want: u32,
}

impl<'a> SearchCtx<'a> {
    fn check_budget(&self, depth: u32) -> Result<(), SolveError> {
        if self.config.timeout_ms != 0
            && self.start.elapsed().as_millis() as u64 > self.config.timeout_ms
        {
            return Err(SolveError::Timeout);
        }
        if self.config.max_depth != 0 && depth > self.config.max_depth {
            return Err(SolveError::DepthExceeded);
        }
        Ok(())
    }
}

/// Run propagation alone to quiescence. `Ok(true)` if that fully solves
/// the puzzle, `Ok(false)` if it quiesces short of that, `Err` on
/// contradiction (spec.md §4.3).
pub fn logic_solve(puzzle: &mut Puzzle, stats: &mut Stats) -> Result<bool, SolveError> {
    let mut history = History::new();
    let mut queue = JobQueue::new();
    let mut changed = Vec::new();
    seed_all_lines(puzzle, &mut queue);
    match propagate(puzzle, &mut queue, &mut history, stats, &mut changed) {
        PropagationStatus::Contradiction => Err(SolveError::Contradiction),
        PropagationStatus::Quiescent => Ok(puzzle.is_solved_full()),
    }
}

/// Run the full search: propagation, probing, and guess-and-backtrack,
/// until the puzzle is solved, proven unsolvable, or a budget expires.
pub fn solve(puzzle: &mut Puzzle, config: &SolverConfig) -> Result<SolveReport, SolveError> {
    let mut history = History::new();
    let mut stats = Stats::default();
    let mut queue = JobQueue::new();
    seed_all_lines(puzzle, &mut queue);

    let want = if config.check_unique {
        2
    } else {
        config.max_solutions.max(1)
    };

    let mut ctx = SearchCtx {
        config,
        start: Instant::now(),
        seed: 0x9E37_79B9_7F4A_7C15,
        solutions: 0,
        want,
    };

    let outcome = search_step(puzzle, &mut history, &mut stats, &mut queue, &mut ctx, 0);
    let status = match outcome {
        Ok(()) | Err(SolveError::Contradiction) => match ctx.solutions {
            0 => SolveStatus::NoSolution,
            1 => SolveStatus::Unique,
            _ => SolveStatus::Multiple,
        },
        Err(e) => return Err(e),
    };

    info!(
        "search finished: {:?} after {} guesses, {} backtracks, {} probes",
        status, stats.nguesses, stats.nbacktracks, stats.nprobes
    );
    Ok(SolveReport { status, stats })
}

fn search_step(
    puzzle: &mut Puzzle,
    history: &mut History,
    stats: &mut Stats,
    queue: &mut JobQueue,
    ctx: &mut SearchCtx,
    depth: u32,
) -> Result<(), SolveError> {
    ctx.check_budget(depth)?;

    let mut changed = Vec::new();
    if ctx.config.allow_linesolve {
        if let PropagationStatus::Contradiction =
            propagate(puzzle, queue, history, stats, &mut changed)
        {
            return Err(SolveError::Contradiction);
        }
    }

    if puzzle.is_solved_full() {
        ctx.solutions += 1;
        stats.nsolutions += 1;
        return if ctx.solutions >= ctx.want {
            Ok(())
        } else {
            // a fully-solved board is a dead end for finding *further*
            // distinct solutions; let the caller backtrack and try the
            // next colour.
            Err(SolveError::Contradiction)
        };
    }

    if ctx.config.allow_exhaust && !history.has_branch() {
        let eliminated = exhaustive_line_check(puzzle, queue, history, stats);
        if eliminated > 0 {
            return search_step(puzzle, history, stats, queue, ctx, depth);
        }
    }

    if ctx.config.allow_probe {
        if run_probe_pass(puzzle, queue, history, stats, ctx.config, &changed)? {
            return search_step(puzzle, history, stats, queue, ctx, depth);
        }
    }

    if !ctx.config.allow_backtrack {
        return Err(SolveError::Stalled);
    }

    let cell = match choose_cell(puzzle, ctx.config.rating_policy) {
        Some(c) => c,
        None => return Err(SolveError::Contradiction),
    };
    let colors: Vec<_> = puzzle.cell_by_index(cell).possible.colors().collect();
    // first guess favors the heuristic's preferred colour; the rest
    // follow in ascending id order so every alternative is eventually
    // tried.
    let preferred = choose_color(puzzle, cell, ctx.config.colour_policy, &mut ctx.seed);
    let mut ordered = vec![preferred];
    ordered.extend(colors.into_iter().filter(|&c| c != preferred));

    for color in ordered {
        let before = puzzle.cell_by_index(cell).possible;
        history.push(cell, before, true, Some(color));
        puzzle.raw_set_possible(cell, ColorSet::single(color));
        if before.popcount() > 1 {
            puzzle.nsolved += 1;
        }
        stats.nguesses += 1;
        queue.flush();
        enqueue_affected(puzzle, queue, cell);

        match search_step(puzzle, history, stats, queue, ctx, depth + 1) {
            Ok(()) => return Ok(()),
            Err(SolveError::Contradiction) => {
                let (undone_cell, _) = history
                    .undo_one_level(puzzle)
                    .expect("a branch was just pushed for this cell");
                debug_assert_eq!(undone_cell, cell);
                stats.nbacktracks += 1;
                queue.flush();
                enqueue_affected(puzzle, queue, cell);
            }
            Err(other) => return Err(other),
        }
    }

    Err(SolveError::Contradiction)
}

/// One probing sweep over every live candidate cell. Returns whether any
/// probe produced new information.
fn run_probe_pass(
    puzzle: &mut Puzzle,
    queue: &mut JobQueue,
    history: &mut History,
    stats: &mut Stats,
    config: &SolverConfig,
    recent: &[usize],
) -> Result<bool, SolveError> {
    let candidates = probe_candidates(puzzle, recent, config.probe_level);
    let mut pad = ProbePad::new();
    let mut progressed = false;

    for cell in candidates {
        if puzzle.cell_by_index(cell).is_solved() || is_redundant(&pad, puzzle, cell) {
            continue;
        }
        match probe_cell(puzzle, history, stats, cell, config.merge_probe) {
            ProbeOutcome::Contradiction => return Err(SolveError::Contradiction),
            ProbeOutcome::Progress => {
                progressed = true;
                enqueue_affected(puzzle, queue, cell);
            }
            ProbeOutcome::NoProgress => {
                for color in puzzle.cell_by_index(cell).possible.colors() {
                    pad.mark(cell, color);
                }
            }
        }
    }
    Ok(progressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Puzzle;

    #[test]
    fn trivial_one_by_one_solves_uniquely() {
        let mut p = Puzzle::new(vec![vec![(1, 1)]], vec![vec![(1, 1)]], 2).unwrap();
        let report = solve(&mut p, &SolverConfig::default()).unwrap();
        assert_eq!(report.status, SolveStatus::Unique);
        assert!(p.is_solved_full());
    }

    #[test]
    fn insoluble_clue_reports_no_solution() {
        // a run of 3 cannot fit a line of length 2
        let mut p = Puzzle::new(vec![vec![(3, 1)]], vec![vec![(1, 1)], vec![(1, 1)]], 2).unwrap();
        let report = solve(&mut p, &SolverConfig::default()).unwrap();
        assert_eq!(report.status, SolveStatus::NoSolution);
    }

    #[test]
    fn ambiguous_puzzle_is_reported_multiple_with_check_unique() {
        // 2x2 board, one diagonal cell each way both satisfy "row:1,col:1"
        let mut p = Puzzle::new(
            vec![vec![(1, 1)], vec![(1, 1)]],
            vec![vec![(1, 1)], vec![(1, 1)]],
            2,
        )
        .unwrap();
        let mut config = SolverConfig::default();
        config.check_unique = true;
        let report = solve(&mut p, &config).unwrap();
        assert_eq!(report.status, SolveStatus::Multiple);
    }

    #[test]
    fn stalled_without_backtrack_on_ambiguous_puzzle() {
        let mut p = Puzzle::new(
            vec![vec![(1, 1)], vec![(1, 1)]],
            vec![vec![(1, 1)], vec![(1, 1)]],
            2,
        )
        .unwrap();
        let mut config = SolverConfig::default();
        config.allow_backtrack = false;
        config.allow_probe = false;
        let err = solve(&mut p, &config).unwrap_err();
        assert_eq!(err, SolveError::Stalled);
    }
}
