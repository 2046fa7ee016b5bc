use nonogrid_core::board::Puzzle;
use nonogrid_core::solver::heuristic::choose_color;
use nonogrid_core::solver::{logic_solve, solve, ColourPolicy, SolveStatus, SolverConfig, Stats};

#[test]
fn trivial_one_by_one() {
    let mut puzzle = Puzzle::new(vec![vec![(1, 1)]], vec![vec![(1, 1)]], 2).unwrap();
    let report = solve(&mut puzzle, &SolverConfig::default()).unwrap();
    assert_eq!(report.status, SolveStatus::Unique);
    assert_eq!(puzzle.cell(0, 0).color(), Some(1));
}

#[test]
fn five_by_five_plus_sign() {
    // a plus sign centered in a 5x5 grid:
    //  . X .
    //  X X X
    //  . X .
    let row_runs = vec![vec![], vec![(1, 1)], vec![(5, 1)], vec![(1, 1)], vec![]];
    let col_runs = vec![vec![], vec![(1, 1)], vec![(5, 1)], vec![(1, 1)], vec![]];
    let mut puzzle = Puzzle::new(row_runs, col_runs, 2).unwrap();
    let report = solve(&mut puzzle, &SolverConfig::default()).unwrap();
    assert_eq!(report.status, SolveStatus::Unique);

    for row in 0..5 {
        for col in 0..5 {
            let expected = if row == 2 || col == 2 { 1 } else { 0 };
            assert_eq!(
                puzzle.cell(row, col).color(),
                Some(expected),
                "mismatch at ({}, {})",
                row,
                col
            );
        }
    }
}

#[test]
fn ambiguous_two_by_two_reports_multiple_with_check_unique() {
    // both diagonals of a 2x2 board satisfy "one filled cell per row and
    // per column": propagation alone can never pick between them.
    let mut puzzle = Puzzle::new(
        vec![vec![(1, 1)], vec![(1, 1)]],
        vec![vec![(1, 1)], vec![(1, 1)]],
        2,
    )
    .unwrap();

    let mut config = SolverConfig::default();
    config.check_unique = true;
    let report = solve(&mut puzzle, &config).unwrap();
    assert_eq!(report.status, SolveStatus::Multiple);
}

#[test]
fn ambiguous_two_by_two_without_check_unique_still_finds_a_solution() {
    let mut puzzle = Puzzle::new(
        vec![vec![(1, 1)], vec![(1, 1)]],
        vec![vec![(1, 1)], vec![(1, 1)]],
        2,
    )
    .unwrap();
    let report = solve(&mut puzzle, &SolverConfig::default()).unwrap();
    // without check_unique the search stops at the first solution found
    assert_eq!(report.status, SolveStatus::Unique);
    assert!(puzzle.is_solved_full());
}

#[test]
fn insoluble_run_too_long_for_its_line() {
    // a run of 3 cannot fit in a line of length 2
    let mut puzzle =
        Puzzle::new(vec![vec![(3, 1)]], vec![vec![(1, 1)], vec![(1, 1)]], 2).unwrap();
    let report = solve(&mut puzzle, &SolverConfig::default()).unwrap();
    assert_eq!(report.status, SolveStatus::NoSolution);
}

#[test]
fn ten_by_ten_diagonal_exercises_probing_and_backtracking() {
    // a diagonal stripe: row i has a single run of length 1 at column i.
    // propagation alone cannot place any of it, since every cell in
    // every row and column starts out equally likely, forcing probing
    // and/or backtracking to resolve it.
    let n = 10;
    let runs = vec![vec![(1, 1)]; n];
    let mut puzzle = Puzzle::new(runs.clone(), runs, 2).unwrap();

    let mut config = SolverConfig::default();
    config.max_depth = 200;
    let report = solve(&mut puzzle, &config).unwrap();
    assert_eq!(report.status, SolveStatus::Unique);
    assert!(puzzle.is_solved_full());
    for i in 0..n {
        for j in 0..n {
            let expected = if i == j { 1 } else { 0 };
            assert_eq!(puzzle.cell(i, j).color(), Some(expected));
        }
    }
}

#[test]
fn contrast_and_max_colour_policies_pick_different_first_guesses() {
    // two independent 2x2 regions: rows/cols 0-1 admit only background or
    // colour 1, rows/cols 2-3 admit only background or colour 2 (each
    // line's clue alphabet excludes the other non-background colour
    // outright). The cols/rows 2-3 region has exactly enough cells for
    // its length-2 run, so it resolves deterministically; the 0-1 region
    // has genuine "which of two cells" position ambiguity that pure line
    // propagation can never settle, leaving a real guess for colour
    // policy to drive.
    let row_runs = vec![
        vec![(1, 1)],
        vec![(1, 1)],
        vec![(2, 2)],
        vec![(2, 2)],
    ];
    let col_runs = vec![
        vec![(1, 1)],
        vec![(1, 1)],
        vec![(2, 2)],
        vec![(2, 2)],
    ];
    let mut puzzle = Puzzle::new(row_runs, col_runs, 3).unwrap();
    let mut stats = Stats::default();
    let fully_solved = logic_solve(&mut puzzle, &mut stats).unwrap();
    assert!(!fully_solved, "the 0-1 region should remain ambiguous after pure propagation");

    // cell (0, 1) sits in the still-ambiguous region: candidates {0, 1},
    // with its only solved neighbour -- (0, 2), forced to background --
    // making background the locally over-represented colour.
    let cell = puzzle.index(0, 1);
    assert!(!puzzle.cell_by_index(cell).is_solved());

    let mut seed = 1;
    let max_choice = choose_color(&puzzle, cell, ColourPolicy::Max, &mut seed);
    let contrast_choice = choose_color(&puzzle, cell, ColourPolicy::Contrast, &mut seed);
    assert_ne!(
        max_choice, contrast_choice,
        "max and contrast policies picked the same first guess"
    );
    assert_eq!(max_choice, 0, "background dominates the global colour count here");
    assert_eq!(contrast_choice, 1, "colour 1 is least represented among solved neighbours");
}

#[test]
fn contrast_and_max_colour_policies_still_reach_the_same_final_answer() {
    // a diagonal stripe genuinely needs a guess to resolve (propagation
    // alone cannot place any cell), but the puzzle itself has exactly
    // one solution -- whichever colour a policy tries first, a wrong
    // guess eventually contradicts and gets backtracked away.
    let n = 10;
    let runs = vec![vec![(1, 1)]; n];

    let mut contrast_puzzle = Puzzle::new(runs.clone(), runs.clone(), 2).unwrap();
    let mut contrast_config = SolverConfig::default();
    contrast_config.colour_policy = ColourPolicy::Contrast;
    contrast_config.max_depth = 200;
    let contrast_report = solve(&mut contrast_puzzle, &contrast_config).unwrap();

    let mut max_puzzle = Puzzle::new(runs.clone(), runs, 2).unwrap();
    let mut max_config = SolverConfig::default();
    max_config.colour_policy = ColourPolicy::Max;
    max_config.max_depth = 200;
    let max_report = solve(&mut max_puzzle, &max_config).unwrap();

    assert_eq!(contrast_report.status, SolveStatus::Unique);
    assert_eq!(max_report.status, SolveStatus::Unique);
    for row in 0..n {
        for col in 0..n {
            assert_eq!(
                contrast_puzzle.cell(row, col).color(),
                max_puzzle.cell(row, col).color()
            );
        }
    }
}

#[test]
fn merging_probes_can_avoid_a_guess_that_heuristic_only_search_needs() {
    // the same diagonal stripe: under pure heuristic guessing it takes at
    // least one guess, but with probing and merging enabled the siblings'
    // common consequences pin the whole board down first.
    let n = 10;
    let runs = vec![vec![(1, 1)]; n];

    let mut heuristic_puzzle = Puzzle::new(runs.clone(), runs.clone(), 2).unwrap();
    let mut heuristic_config = SolverConfig::default();
    heuristic_config.allow_probe = false;
    heuristic_config.max_depth = 200;
    let heuristic_report = solve(&mut heuristic_puzzle, &heuristic_config).unwrap();
    assert_eq!(heuristic_report.status, SolveStatus::Unique);
    assert!(heuristic_report.stats.nguesses >= 1);

    let mut probe_puzzle = Puzzle::new(runs.clone(), runs, 2).unwrap();
    let mut probe_config = SolverConfig::default();
    probe_config.allow_probe = true;
    probe_config.merge_probe = true;
    probe_config.max_depth = 200;
    let probe_report = solve(&mut probe_puzzle, &probe_config).unwrap();
    assert_eq!(probe_report.status, SolveStatus::Unique);
    assert_eq!(probe_report.stats.nguesses, 0);
    assert!(probe_report.stats.merges >= 1);

    for row in 0..n {
        for col in 0..n {
            assert_eq!(
                heuristic_puzzle.cell(row, col).color(),
                probe_puzzle.cell(row, col).color()
            );
        }
    }
}
