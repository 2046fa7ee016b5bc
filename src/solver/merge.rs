//! Probe merge buffer and probe pad (spec.md §4.6, §4.7).
//!
//! Probing a cell tries each of its candidate colours in turn, rolling
//! the board back after each. [`MergeBuffer`] intersects what every
//! sibling guess eliminates, so colours ruled out *no matter which
//! branch turns out true* become guaranteed facts even when no single
//! branch alone proves anything. [`ProbePad`] remembers which
//! (cell, colour) guesses a probing pass has already spent, so a later
//! candidate whose consequences would only repeat earlier work is
//! skipped.

use hashbrown::HashSet;

use crate::bitset::{ColorId, ColorSet};

/// Accumulates, across a cell's sibling probes, the colours eliminated
/// (board-wide) in *every* branch tried so far.
pub struct MergeBuffer {
    baseline: Vec<ColorSet>,
    accumulated: Option<Vec<ColorSet>>,
    snapshot: Option<Vec<ColorSet>>,
    tried: usize,
}

impl MergeBuffer {
    /// `baseline` is the board's per-cell possibilities before any
    /// sibling of this probe ran.
    pub fn new(baseline: Vec<ColorSet>) -> Self {
        MergeBuffer {
            baseline,
            accumulated: None,
            snapshot: None,
            tried: 0,
        }
    }

    /// Call before propagating a sibling guess, so a subsequent
    /// [`Self::merge_cancel`] can undo exactly this sibling's contribution.
    pub fn start_sibling(&mut self) {
        self.snapshot = self.accumulated.clone();
    }

    /// Record what one sibling guess settled the board to, intersecting
    /// its eliminations into the running total.
    pub fn merge_set(&mut self, after: &[ColorSet]) {
        debug_assert_eq!(after.len(), self.baseline.len());
        let eliminated: Vec<ColorSet> = self
            .baseline
            .iter()
            .zip(after.iter())
            .map(|(&before, &after)| before.difference(after))
            .collect();
        self.accumulated = Some(match self.accumulated.take() {
            None => eliminated,
            Some(prev) => prev
                .iter()
                .zip(eliminated.iter())
                .map(|(&p, &e)| p.intersect(e))
                .collect(),
        });
        self.tried += 1;
    }

    /// Discard the sibling started since the last [`Self::start_sibling`]
    /// (e.g. because the probe was itself abandoned as redundant).
    pub fn merge_cancel(&mut self) {
        self.accumulated = self.snapshot.take();
    }

    /// The guaranteed board-wide eliminations once at least `min_siblings`
    /// branches have been merged, or `None` if too few have run to trust
    /// the result.
    pub fn merge_check(&self, min_siblings: usize) -> Option<&[ColorSet]> {
        if self.tried >= min_siblings {
            self.accumulated.as_deref()
        } else {
            None
        }
    }
}

/// Tracks which (cell, colour) guesses a probing pass has already spent,
/// so later candidates whose consequences are already known are skipped.
#[derive(Debug, Default)]
pub struct ProbePad {
    attempted: HashSet<(usize, ColorId)>,
}

impl ProbePad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, cell: usize, color: ColorId) {
        let _ = self.attempted.insert((cell, color));
    }

    pub fn seen(&self, cell: usize, color: ColorId) -> bool {
        self.attempted.contains(&(cell, color))
    }

    pub fn clear(&mut self) {
        self.attempted.clear();
    }
}
