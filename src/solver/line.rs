//! The left-right-overlap line solver (spec.md §4.1).
//!
//! Given one line's clue and the current per-cell colour possibilities,
//! compute the intersection of every leftmost-to-rightmost valid run
//! placement, yielding tightened per-cell possibilities, or signal a
//! contradiction if the clue cannot be placed at all.
//!
//! The placements themselves are never materialised as two separate
//! arrays. Instead we compute, for every (position, blocks-remaining)
//! pair, whether the suffix of the line from `position` backward to the
//! start can still accommodate `blocks-remaining` runs -- a forward/
//! backward reachability table that is exactly the practical computation
//! spec.md §4.1 describes: "form the union over the valid positional
//! range of the colours that run covers". A position/colour combination
//! is marked possible exactly when it participates in some placement
//! that is reachable from the whole-line root query, which is either
//! leftmost, rightmost, or anything validly in between.

use crate::bitset::ColorSet;
use crate::board::Clue;
use crate::color::BACKGROUND;

/// Contradiction: this line's clue admits no placement at all.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Contradiction;

struct LineSolver<'a> {
    runs: &'a [(usize, u32)],
    line: &'a [ColorSet],
    block_sums: Vec<usize>,
    job_size: usize,
    table: Vec<Option<bool>>,
    solved: Vec<ColorSet>,
}

impl<'a> LineSolver<'a> {
    fn new(clue: &'a Clue, line: &'a [ColorSet]) -> Self {
        let runs = &clue.runs[..];
        let block_sums = Self::calc_block_sums(runs);
        let job_size = runs.len() + 1;
        Self {
            runs,
            line,
            block_sums,
            job_size,
            table: vec![None; job_size * line.len().max(1)],
            solved: vec![ColorSet::EMPTY; line.len()],
        }
    }

    fn calc_block_sums(runs: &[(usize, u32)]) -> Vec<usize> {
        let mut sums = Vec::with_capacity(runs.len() + 1);
        sums.push(0);
        let mut prev: Option<(usize, u32)> = None;
        for &(len, color) in runs {
            let current = match prev {
                None => len,
                Some((prev_cum, prev_color)) => {
                    prev_cum + len + if prev_color == color { 1 } else { 0 }
                }
            };
            // block_sums[i] is the earliest index (0-based) at which block i
            // (1-indexed) could possibly finish.
            sums.push(if current == 0 { 0 } else { current - 1 });
            prev = Some((current, color));
        }
        sums
    }

    fn solve(&mut self) -> bool {
        if self.line.is_empty() {
            return true;
        }
        let last = self.line.len() as isize - 1;
        self.get_sol(last, self.runs.len())
    }

    fn cached(&self, position: usize, block: usize) -> Option<bool> {
        self.table[position * self.job_size + block]
    }

    fn store(&mut self, position: usize, block: usize, value: bool) {
        self.table[position * self.job_size + block] = Some(value);
    }

    fn get_sol(&mut self, position: isize, block: usize) -> bool {
        if position < 0 {
            return block == 0;
        }
        let position = position as usize;
        if let Some(v) = self.cached(position, block) {
            return v;
        }
        let v = self.fill(position, block);
        self.store(position, block, v);
        v
    }

    fn fill(&mut self, position: usize, block: usize) -> bool {
        if position < self.block_sums[block] {
            return false;
        }
        // both branches always evaluated: they independently mark every
        // colour consistent with some valid completion, not just the
        // first one found.
        let blank = self.fill_blank(position, block);
        let colored = self.fill_color(position, block);
        blank | colored
    }

    fn fill_blank(&mut self, position: usize, block: usize) -> bool {
        if !self.line[position].test(BACKGROUND) {
            return false;
        }
        if self.get_sol(position as isize - 1, block) {
            self.solved[position] = self.solved[position].union(ColorSet::single(BACKGROUND));
            true
        } else {
            false
        }
    }

    fn fill_color(&mut self, position: usize, block: usize) -> bool {
        if block == 0 {
            return false;
        }
        let (len, color) = self.runs[block - 1];
        let mut block_size = len;
        let trailing_space = self.trails_with_space(block);
        if trailing_space {
            block_size += 1;
        }

        let block_start = position as isize - block_size as isize + 1;
        if !self.can_place(block_start, position, color, trailing_space) {
            return false;
        }

        if self.get_sol(block_start - 1, block - 1) {
            self.mark_placed(block_start, position, color, trailing_space);
            true
        } else {
            false
        }
    }

    fn trails_with_space(&self, block: usize) -> bool {
        if block < self.runs.len() {
            self.runs[block - 1].1 == self.runs[block].1
        } else {
            false
        }
    }

    fn can_place(&self, start: isize, mut end: usize, color: u32, trailing_space: bool) -> bool {
        if start < 0 {
            return false;
        }
        if trailing_space {
            if !self.line[end].test(BACKGROUND) {
                return false;
            }
        } else {
            end += 1;
        }
        self.line[start as usize..end].iter().all(|c| c.test(color))
    }

    fn mark_placed(&mut self, start: isize, mut end: usize, color: u32, trailing_space: bool) {
        if trailing_space {
            self.solved[end] = self.solved[end].union(ColorSet::single(BACKGROUND));
        } else {
            end += 1;
        }
        let single = ColorSet::single(color);
        for cell in &mut self.solved[start as usize..end] {
            *cell = cell.union(single);
        }
    }
}

/// Solve one line. Returns the tightened per-cell possibility sets (each
/// a subset of the input), or [`Contradiction`] if the clue cannot be
/// placed at all.
pub fn solve_line(clue: &Clue, possible: &[ColorSet]) -> Result<Vec<ColorSet>, Contradiction> {
    if clue.slack < 0 {
        return Err(Contradiction);
    }
    let mut solver = LineSolver::new(clue, possible);
    if solver.solve() {
        let solved = solver.solved;
        // defensive: every bit already passed a can_be/can_be_blank check
        // against `possible`, so this is a no-op in practice.
        let tightened: Vec<_> = solved
            .into_iter()
            .zip(possible.iter())
            .map(|(new, &old)| new.intersect(old))
            .collect();
        if tightened.iter().any(ColorSet::is_empty) {
            return Err(Contradiction);
        }
        Ok(tightened)
    } else {
        Err(Contradiction)
    }
}
