//! Probing: speculative single-cell guesses, rolled back immediately,
//! whose common consequences become guaranteed facts (spec.md §4.9).
//!
//! Each candidate colour of a cell is tried in turn inside a history
//! checkpoint. A guess that contradicts eliminates that colour outright.
//! A guess that reaches quiescence contributes its resulting board state
//! to a [`MergeBuffer`]; once every surviving colour has contributed,
//! whatever the buffer agrees on board-wide is true regardless of which
//! of those colours the cell actually turns out to hold, and is applied
//! to the live board before moving on.

use log::trace;

use crate::bitset::ColorSet;
use crate::board::{Direction, Puzzle};
use crate::solver::history::History;
use crate::solver::job_queue::JobQueue;
use crate::solver::merge::{MergeBuffer, ProbePad};
use crate::solver::propagation::{propagate, PropagationStatus};
use crate::solver::Stats;

/// What probing a single cell established.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// Every surviving guess agreed on at least one new fact, applied to
    /// the board in place.
    Progress,
    /// No candidate colour for this cell survived: the position itself
    /// is unsolvable.
    Contradiction,
    /// Nothing new was learned.
    NoProgress,
}

/// Probe one cell: try each of its candidate colours, merge what the
/// surviving ones agree on, and apply the result to `puzzle`. When
/// `merge_probe` is false, no [`MergeBuffer`] is used at all -- a colour
/// is eliminated only when it directly contradicts on its own, and
/// facts that would only emerge from what *every* surviving sibling
/// agrees on are left undiscovered (spec.md §6).
pub fn probe_cell(
    puzzle: &mut Puzzle,
    history: &mut History,
    stats: &mut Stats,
    cell_idx: usize,
    merge_probe: bool,
) -> ProbeOutcome {
    if merge_probe {
        probe_cell_merged(puzzle, history, stats, cell_idx)
    } else {
        probe_cell_without_merge(puzzle, history, stats, cell_idx)
    }
}

fn probe_cell_merged(
    puzzle: &mut Puzzle,
    history: &mut History,
    stats: &mut Stats,
    cell_idx: usize,
) -> ProbeOutcome {
    let candidates: Vec<_> = puzzle.cell_by_index(cell_idx).possible.colors().collect();
    if candidates.len() <= 1 {
        return ProbeOutcome::NoProgress;
    }

    let baseline: Vec<ColorSet> = (0..puzzle.ncells())
        .map(|i| puzzle.cell_by_index(i).possible)
        .collect();
    let mut merge = MergeBuffer::new(baseline);
    let mut surviving = 0usize;

    for &color in &candidates {
        let checkpoint = history.begin_checkpoint();
        merge.start_sibling();

        let old = puzzle.cell_by_index(cell_idx).possible;
        history.push(cell_idx, old, false, None);
        puzzle.raw_set_possible(cell_idx, ColorSet::single(color));
        if old.popcount() > 1 {
            puzzle.nsolved += 1;
        }

        let (row, col) = {
            let cell = puzzle.cell_by_index(cell_idx);
            (cell.row, cell.col)
        };
        let mut local_queue = JobQueue::new();
        local_queue.add(Direction::Row, row, 0);
        local_queue.add(Direction::Col, col, 0);

        let status = propagate(puzzle, &mut local_queue, history, stats, &mut Vec::new());
        stats.nprobes += 1;

        match status {
            PropagationStatus::Contradiction => {
                trace!("probe cell {} color {} contradicts", cell_idx, color);
                history.rollback_to(checkpoint, puzzle);
                merge.merge_cancel();
            }
            PropagationStatus::Quiescent => {
                let after: Vec<ColorSet> = (0..puzzle.ncells())
                    .map(|i| puzzle.cell_by_index(i).possible)
                    .collect();
                history.rollback_to(checkpoint, puzzle);
                merge.merge_set(&after);
                surviving += 1;
            }
        }
    }

    if surviving == 0 {
        return ProbeOutcome::Contradiction;
    }

    let eliminations = match merge.merge_check(surviving) {
        Some(e) => e.to_vec(),
        None => return ProbeOutcome::NoProgress,
    };

    let mut progressed = false;
    for (idx, elim) in eliminations.iter().enumerate() {
        if elim.is_empty() {
            continue;
        }
        let old = puzzle.cell_by_index(idx).possible;
        let new = old.difference(*elim);
        if new == old {
            continue;
        }
        progressed = true;
        history.push(idx, old, false, None);
        puzzle.raw_set_possible(idx, new);
        if old.popcount() > 1 && new.popcount() == 1 {
            puzzle.nsolved += 1;
        }
    }

    if progressed {
        stats.merges += 1;
        ProbeOutcome::Progress
    } else {
        ProbeOutcome::NoProgress
    }
}

/// Per-colour-only variant used when `merge_probe` is disabled: a colour
/// is eliminated the moment its own probe contradicts, with no attempt
/// to learn anything from what the surviving siblings have in common.
fn probe_cell_without_merge(
    puzzle: &mut Puzzle,
    history: &mut History,
    stats: &mut Stats,
    cell_idx: usize,
) -> ProbeOutcome {
    let candidates: Vec<_> = puzzle.cell_by_index(cell_idx).possible.colors().collect();
    if candidates.len() <= 1 {
        return ProbeOutcome::NoProgress;
    }

    let mut progressed = false;
    let mut surviving = 0usize;

    for &color in &candidates {
        let checkpoint = history.begin_checkpoint();

        let old = puzzle.cell_by_index(cell_idx).possible;
        history.push(cell_idx, old, false, None);
        puzzle.raw_set_possible(cell_idx, ColorSet::single(color));
        if old.popcount() > 1 {
            puzzle.nsolved += 1;
        }

        let (row, col) = {
            let cell = puzzle.cell_by_index(cell_idx);
            (cell.row, cell.col)
        };
        let mut local_queue = JobQueue::new();
        local_queue.add(Direction::Row, row, 0);
        local_queue.add(Direction::Col, col, 0);

        let status = propagate(puzzle, &mut local_queue, history, stats, &mut Vec::new());
        stats.nprobes += 1;
        history.rollback_to(checkpoint, puzzle);

        match status {
            PropagationStatus::Contradiction => {
                trace!("probe cell {} color {} contradicts", cell_idx, color);
                let current = puzzle.cell_by_index(cell_idx).possible;
                let new = current.difference(ColorSet::single(color));
                if new != current {
                    history.push(cell_idx, current, false, None);
                    puzzle.raw_set_possible(cell_idx, new);
                    if current.popcount() > 1 && new.popcount() == 1 {
                        puzzle.nsolved += 1;
                    }
                    progressed = true;
                }
            }
            PropagationStatus::Quiescent => surviving += 1,
        }
    }

    if surviving == 0 {
        return ProbeOutcome::Contradiction;
    }
    if progressed {
        ProbeOutcome::Progress
    } else {
        ProbeOutcome::NoProgress
    }
}

/// Re-enqueue every line crossing a cell whose possibilities just
/// tightened, so a subsequent `propagate` sees the probe's effects.
pub fn enqueue_affected(puzzle: &Puzzle, queue: &mut JobQueue, cell_idx: usize) {
    let cell = puzzle.cell_by_index(cell_idx);
    let row_slack = puzzle.clue(Direction::Row, cell.row).slack;
    let col_slack = puzzle.clue(Direction::Col, cell.col).slack;
    queue.add(Direction::Row, cell.row, -row_slack);
    queue.add(Direction::Col, cell.col, -col_slack);
}

/// Candidate cells for one probing pass. `recent` holds cells changed
/// since the last quiescent propagation; when `probe_level > 1` the pass
/// is restricted to cells within that many grid steps of `recent` first,
/// falling back to every unsolved cell once the neighbourhood is
/// exhausted (spec.md §4.9's neighbourhood-then-full-pass strategy).
pub fn probe_candidates(puzzle: &Puzzle, recent: &[usize], probe_level: u32) -> Vec<usize> {
    if probe_level <= 1 || recent.is_empty() {
        return (0..puzzle.ncells())
            .filter(|&i| !puzzle.cell_by_index(i).is_solved())
            .collect();
    }

    let radius = probe_level as isize;
    let mut seen = hashbrown::HashSet::new();
    let mut ordered = Vec::new();
    for &seed in recent {
        let cell = puzzle.cell_by_index(seed);
        let (r0, c0) = (cell.row as isize, cell.col as isize);
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if dr.abs() + dc.abs() > radius {
                    continue;
                }
                let (r, c) = (r0 + dr, c0 + dc);
                if r < 0 || c < 0 || r as usize >= puzzle.height || c as usize >= puzzle.width {
                    continue;
                }
                let idx = puzzle.index(r as usize, c as usize);
                if puzzle.cell_by_index(idx).is_solved() {
                    continue;
                }
                if seen.insert(idx) {
                    ordered.push(idx);
                }
            }
        }
    }
    if ordered.is_empty() {
        (0..puzzle.ncells())
            .filter(|&i| !puzzle.cell_by_index(i).is_solved())
            .collect()
    } else {
        ordered
    }
}

/// Suppress a candidate whose every colour has already been probed this
/// pass with no new facts -- re-running it would only repeat work.
pub fn is_redundant(pad: &ProbePad, puzzle: &Puzzle, cell_idx: usize) -> bool {
    puzzle
        .cell_by_index(cell_idx)
        .possible
        .colors()
        .all(|c| pad.seen(cell_idx, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Puzzle;
    use crate::solver::history::History;
    use crate::solver::Stats;

    #[test]
    fn probing_a_forced_cell_is_noop() {
        let mut p = Puzzle::new(vec![vec![(1, 1)]], vec![vec![(1, 1)]], 2).unwrap();
        p.raw_set_possible(0, ColorSet::single(1));
        p.nsolved += 1;
        let mut hist = History::new();
        let mut stats = Stats::default();
        match probe_cell(&mut p, &mut hist, &mut stats, 0, true) {
            ProbeOutcome::NoProgress => {}
            other => panic!("expected NoProgress, got {:?}", other),
        }
    }

    #[test]
    fn probing_eliminates_contradicting_colour() {
        // row "2", col "1" on a 1x2 board: cell (0,0) colour 2 is
        // possible locally but would force the whole row contradiction.
        let mut p = Puzzle::new(vec![vec![(2, 1)]], vec![vec![(1, 1)], vec![(1, 1)]], 3).unwrap();
        // artificially widen cell 0's candidates to include a colour (2)
        // that cannot appear anywhere in this single-colour puzzle.
        let widened = p.cell_by_index(0).possible.union(ColorSet::single(2));
        p.raw_set_possible(0, widened);

        let mut hist = History::new();
        let mut stats = Stats::default();
        let outcome = probe_cell(&mut p, &mut hist, &mut stats, 0, true);
        assert!(matches!(outcome, ProbeOutcome::Progress));
        assert!(!p.cell_by_index(0).possible.test(2));
        assert_eq!(stats.merges, 1);
    }

    #[test]
    fn probing_without_merge_still_eliminates_a_directly_contradicting_colour() {
        let mut p = Puzzle::new(vec![vec![(2, 1)]], vec![vec![(1, 1)], vec![(1, 1)]], 3).unwrap();
        let widened = p.cell_by_index(0).possible.union(ColorSet::single(2));
        p.raw_set_possible(0, widened);

        let mut hist = History::new();
        let mut stats = Stats::default();
        let outcome = probe_cell(&mut p, &mut hist, &mut stats, 0, false);
        assert!(matches!(outcome, ProbeOutcome::Progress));
        assert!(!p.cell_by_index(0).possible.test(2));
        // no sibling-consensus merge ran, so the counter stays at zero
        assert_eq!(stats.merges, 0);
    }

    #[test]
    fn candidates_respect_neighbourhood_radius() {
        let p = Puzzle::new(
            vec![vec![(1, 1)], vec![(1, 1)], vec![(1, 1)]],
            vec![vec![(1, 1)], vec![(1, 1)], vec![(1, 1)]],
            2,
        )
        .unwrap();
        let center = p.index(1, 1);
        let near = probe_candidates(&p, &[center], 1);
        assert!(near.contains(&center));
        assert!(near.len() < p.ncells());
    }
}
