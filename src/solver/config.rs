//! Solver configuration: which techniques are enabled and how guesses are
//! chosen when propagation alone cannot finish the puzzle (spec.md §6).

#[cfg(feature = "ini")]
use serde_derive::Deserialize;

/// How a candidate cell's "rating" (guess desirability) is computed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "ini", derive(Deserialize))]
#[cfg_attr(feature = "ini", serde(rename_all = "lowercase"))]
pub enum RatingPolicy {
    /// Fewest remaining candidate colours, ties broken by lowest index.
    Simple,
    /// Weighted by a hand-tuned mix of slack and run count.
    AdHoc,
    /// Weighted by an information-theoretic estimate of the guess's
    /// expected constraining power.
    Math,
}

/// How a colour is chosen for the winning candidate cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "ini", derive(Deserialize))]
#[cfg_attr(feature = "ini", serde(rename_all = "lowercase"))]
pub enum ColourPolicy {
    /// The colour with the most remaining candidate cells across the board.
    Max,
    /// The colour with the fewest remaining candidate cells.
    Min,
    /// Uniformly at random among the cell's remaining candidates.
    Random,
    /// The colour least represented among the cell's already-solved
    /// neighbours, to maximise the contrast of the guess.
    Contrast,
}

/// Tunables governing which solving techniques run and how aggressively.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ini", derive(Deserialize))]
#[cfg_attr(feature = "ini", serde(default))]
pub struct SolverConfig {
    /// Run line-solving at all. Disabling this only makes sense paired
    /// with `allow_exhaust` for correctness testing.
    pub allow_linesolve: bool,
    /// Allow guessing-and-backtracking once propagation stalls.
    pub allow_backtrack: bool,
    /// Allow probing (speculative guesses merged for their common
    /// consequences, without committing to either).
    pub allow_probe: bool,
    /// `1` probes only candidates adjacent to recently-changed cells;
    /// higher values widen the neighbourhood, and any value above the
    /// puzzle's diameter degenerates to a full-board pass.
    pub probe_level: u32,
    /// Merge the eliminations common to every sibling probe of a cell
    /// into guaranteed facts, even when no single probe alone proves
    /// anything (spec.md §4.6).
    pub merge_probe: bool,
    /// When propagation and probing both stall with no branch taken yet,
    /// run the exhaustive line check (spec.md §4.5) before giving up and
    /// falling back to a heuristic guess: tentatively pin each remaining
    /// colour of every unsolved cell in turn and re-solve its two
    /// crossing lines, permanently discarding any colour that leaves
    /// either line with no valid placement.
    pub allow_exhaust: bool,
    /// Report `Multiple` rather than stopping at the first solution once
    /// a second is found.
    pub check_unique: bool,
    pub rating_policy: RatingPolicy,
    pub colour_policy: ColourPolicy,
    /// Stop after this many complete solutions (0 = unbounded, treated as
    /// 1; `check_unique` overrides this to 2 regardless).
    pub max_solutions: u32,
    /// Wall-clock budget in milliseconds, 0 = unbounded.
    pub timeout_ms: u64,
    /// Maximum backtracking recursion depth, 0 = unbounded.
    pub max_depth: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            allow_linesolve: true,
            allow_backtrack: true,
            allow_probe: true,
            probe_level: 2,
            merge_probe: true,
            allow_exhaust: false,
            check_unique: false,
            rating_policy: RatingPolicy::AdHoc,
            colour_policy: ColourPolicy::Contrast,
            max_solutions: 0,
            timeout_ms: 0,
            max_depth: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = SolverConfig::default();
        assert!(cfg.allow_linesolve);
        assert!(cfg.allow_backtrack);
        assert_eq!(cfg.rating_policy, RatingPolicy::AdHoc);
        assert_eq!(cfg.colour_policy, ColourPolicy::Contrast);
    }
}
