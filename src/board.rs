//! Grid model: cells, lines, clues and the [`Puzzle`] that owns them.

use std::fmt;

use crate::bitset::{ColorId, ColorSet};

/// A line runs either across a row or down a column. Kept as an explicit
/// enum (not a bare `bool`) so the data model admits a third direction
/// later without redesign.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Row,
    Col,
}

impl Direction {
    pub fn other(self) -> Self {
        match self {
            Direction::Row => Direction::Col,
            Direction::Col => Direction::Row,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if *self == Direction::Row { "row" } else { "column" })
    }
}

/// A single cell's candidate colours.
#[derive(Debug, Copy, Clone)]
pub struct Cell {
    pub possible: ColorSet,
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn n(&self) -> u32 {
        self.possible.popcount()
    }

    pub fn is_solved(&self) -> bool {
        self.n() == 1
    }

    pub fn color(&self) -> Option<ColorId> {
        self.possible.single_color()
    }
}

/// One line's clue: an ordered sequence of (length, colour) runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub runs: Vec<(usize, ColorId)>,
    /// line-length minus the minimum total layout length. Negative means
    /// the clue cannot possibly fit on a line of this length.
    pub slack: isize,
}

impl Clue {
    pub fn new(runs: Vec<(usize, ColorId)>, line_len: usize) -> Self {
        let mut min_len = 0usize;
        for (i, &(len, color)) in runs.iter().enumerate() {
            min_len += len;
            if i > 0 {
                let (_, prev_color) = runs[i - 1];
                if prev_color == color {
                    min_len += 1;
                }
            }
        }
        Clue {
            runs,
            slack: line_len as isize - min_len as isize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<_> = self
            .runs
            .iter()
            .map(|(len, color)| format!("{}:{}", len, color))
            .collect();
        write!(f, "[{}]", parts.join(" "))
    }
}

/// Owns the cells, clues and palette size of one puzzle instance.
///
/// Cells never own lines and lines never own cells: a line is a view into
/// the flat `cells` array, addressed by row/column index, exactly as
/// spec.md §9 prescribes.
#[derive(Debug)]
pub struct Puzzle {
    pub height: usize,
    pub width: usize,
    pub ncolors: u32,
    pub row_clues: Vec<Clue>,
    pub col_clues: Vec<Clue>,
    cells: Vec<Cell>,
    pub nsolved: usize,
}

impl Puzzle {
    pub fn new(
        row_runs: Vec<Vec<(usize, ColorId)>>,
        col_runs: Vec<Vec<(usize, ColorId)>>,
        ncolors: u32,
    ) -> Result<Self, String> {
        let height = row_runs.len();
        let width = col_runs.len();

        if ncolors == 0 || ncolors > crate::bitset::MAX_COLORS {
            return Err(format!(
                "ncolor must be in 1..={}, got {}",
                crate::bitset::MAX_COLORS,
                ncolors
            ));
        }

        let row_clues: Vec<_> = row_runs
            .into_iter()
            .map(|runs| Clue::new(runs, width))
            .collect();
        let col_clues: Vec<_> = col_runs
            .into_iter()
            .map(|runs| Clue::new(runs, height))
            .collect();

        let initial = ColorSet::full(ncolors);
        let mut cells = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                cells.push(Cell {
                    possible: initial,
                    row,
                    col,
                });
            }
        }

        Ok(Puzzle {
            height,
            width,
            ncolors,
            row_clues,
            col_clues,
            cells,
            nsolved: 0,
        })
    }

    pub fn ncells(&self) -> usize {
        self.height * self.width
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    pub fn cell_by_index(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn is_solved_full(&self) -> bool {
        self.nsolved == self.ncells()
    }

    pub fn line_len(&self, direction: Direction) -> usize {
        match direction {
            Direction::Row => self.width,
            Direction::Col => self.height,
        }
    }

    pub fn num_lines(&self, direction: Direction) -> usize {
        match direction {
            Direction::Row => self.height,
            Direction::Col => self.width,
        }
    }

    pub fn clue(&self, direction: Direction, index: usize) -> &Clue {
        match direction {
            Direction::Row => &self.row_clues[index],
            Direction::Col => &self.col_clues[index],
        }
    }

    /// Cell indices making up the line `index` in `direction`, in order.
    pub fn line_indices(&self, direction: Direction, index: usize) -> Vec<usize> {
        match direction {
            Direction::Row => (0..self.width).map(|col| self.index(index, col)).collect(),
            Direction::Col => (0..self.height).map(|row| self.index(row, index)).collect(),
        }
    }

    pub fn line_possible(&self, direction: Direction, index: usize) -> Vec<ColorSet> {
        self.line_indices(direction, index)
            .into_iter()
            .map(|i| self.cells[i].possible)
            .collect()
    }

    /// Unconditionally overwrite a cell's possible set, without touching
    /// history or `nsolved` bookkeeping. Used only by history/backtrack
    /// restoration, which manage those invariants themselves.
    pub(crate) fn raw_set_possible(&mut self, cell_idx: usize, new: ColorSet) {
        self.cells[cell_idx].possible = new;
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The line (other than `from`) crossing the cell at `cell_idx`.
    pub fn crossing_line(&self, from: Direction, cell_idx: usize) -> (Direction, usize) {
        let cell = &self.cells[cell_idx];
        match from {
            Direction::Row => (Direction::Col, cell.col),
            Direction::Col => (Direction::Row, cell.row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Puzzle {
        // 1x1, one colour besides background, clue "1".
        Puzzle::new(vec![vec![(1, 1)]], vec![vec![(1, 1)]], 2).unwrap()
    }

    #[test]
    fn fresh_puzzle_is_unsolved() {
        let p = tiny();
        assert_eq!(p.nsolved, 0);
        assert!(!p.is_solved_full());
        assert_eq!(p.cell(0, 0).n(), 2);
    }

    #[test]
    fn clue_slack() {
        // line length 5, one run of length 3 -> slack 2
        let c = Clue::new(vec![(3, 1)], 5);
        assert_eq!(c.slack, 2);

        // two runs of the same colour need a mandatory gap
        let c = Clue::new(vec![(1, 1), (1, 1)], 3);
        assert_eq!(c.slack, 0);

        // negative slack: the clue cannot fit
        let c = Clue::new(vec![(3, 1)], 2);
        assert_eq!(c.slack, -1);
    }

    #[test]
    fn crossing_line() {
        let p = Puzzle::new(
            vec![vec![(1, 1)], vec![(1, 1)]],
            vec![vec![(2, 1)]],
            2,
        )
        .unwrap();
        let idx = p.index(1, 0);
        assert_eq!(p.crossing_line(Direction::Row, idx), (Direction::Col, 0));
        assert_eq!(p.crossing_line(Direction::Col, idx), (Direction::Row, 1));
    }
}
