//! LIFO undo stack of per-cell prior states, plus the checkpoint mechanism
//! that brackets speculative mutation (probes) with guaranteed rollback.

use crate::bitset::{ColorId, ColorSet};
use crate::board::Puzzle;

#[derive(Debug, Copy, Clone)]
struct HistEntry {
    cell: usize,
    old_possible: ColorSet,
    /// Marks a speculative guess a real backtrack may invert.
    branch: bool,
    /// The colour assigned when `branch` is true -- what `backtrack`
    /// clears on inversion.
    guessed_color: Option<ColorId>,
}

/// The undo stack. Grows only while at least one branch is live or a
/// checkpoint (probe) is open; otherwise `push` is a no-op, so ordinary
/// logic-only propagation costs nothing in history bookkeeping.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistEntry>,
    live_branches: usize,
    open_checkpoints: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.live_branches > 0 || self.open_checkpoints > 0
    }

    pub fn has_branch(&self) -> bool {
        self.live_branches > 0
    }

    /// Record a cell's prior state before mutating it. `branch` marks a
    /// speculative guess that a future `backtrack` may invert with
    /// `guessed_color`.
    pub fn push(
        &mut self,
        cell: usize,
        old_possible: ColorSet,
        branch: bool,
        guessed_color: Option<ColorId>,
    ) {
        if branch {
            self.live_branches += 1;
        }
        if self.is_recording() {
            self.entries.push(HistEntry {
                cell,
                old_possible,
                branch,
                guessed_color,
            });
        }
    }

    fn restore(puzzle: &mut Puzzle, entry: &HistEntry) {
        let was_solved = puzzle.cell_by_index(entry.cell).is_solved();
        puzzle.raw_set_possible(entry.cell, entry.old_possible);
        let now_solved = puzzle.cell_by_index(entry.cell).is_solved();
        if was_solved && !now_solved {
            puzzle.nsolved -= 1;
        } else if !was_solved && now_solved {
            puzzle.nsolved += 1;
        }
    }

    /// Pop entries until (and including) the next branch entry, restoring
    /// each cell. Returns the branch's (cell, guessed_color), or `None`
    /// if no branch remains.
    pub fn undo_one_level(&mut self, puzzle: &mut Puzzle) -> Option<(usize, ColorId)> {
        loop {
            let entry = self.entries.pop()?;
            Self::restore(puzzle, &entry);
            if entry.branch {
                self.live_branches -= 1;
                let color = entry
                    .guessed_color
                    .expect("branch entries always carry a guessed color");
                return Some((entry.cell, color));
            }
        }
    }

    /// Open a speculative scope. Returns a marker to later roll back to
    /// or commit.
    pub fn begin_checkpoint(&mut self) -> usize {
        self.open_checkpoints += 1;
        self.entries.len()
    }

    /// Keep every mutation made since `checkpoint` as part of the trunk.
    pub fn commit_checkpoint(&mut self) {
        self.open_checkpoints -= 1;
    }

    /// Undo every mutation made since `checkpoint`, restoring cell states.
    pub fn rollback_to(&mut self, checkpoint: usize, puzzle: &mut Puzzle) {
        while self.entries.len() > checkpoint {
            let entry = self.entries.pop().expect("checked len() > checkpoint");
            Self::restore(puzzle, &entry);
            if entry.branch {
                self.live_branches -= 1;
            }
        }
        self.open_checkpoints -= 1;
    }
}
