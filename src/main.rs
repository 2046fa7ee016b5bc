#[macro_use]
extern crate log;

use std::fs;
use std::io::{stdin, Read};
use std::str::FromStr;

use clap::{value_t, App, Arg, ArgMatches};

use nonogrid_core::board::Puzzle;
use nonogrid_core::parser::{ClueText, ParseError};
use nonogrid_core::render::ShellRenderer;
use nonogrid_core::solver::{solve, ColourPolicy, RatingPolicy, SolveStatus, SolverConfig};

fn main() -> Result<(), ParseError> {
    #[cfg(feature = "logger")]
    env_logger::init();

    let matches = App::new("nonogrid")
        .version("0.1.0")
        .about("Constraint-propagation nonogram solver")
        .arg(
            Arg::with_name("INPUT")
                .help("The puzzle file to solve. When absent, read from stdin.")
                .index(1),
        )
        .args_from_usage(
            "-m, --max-solutions=[N] 'Stop searching after finding enough solutions'
             -t, --timeout=[MS] 'Stop searching after this many milliseconds'
             -d, --max-depth=[DEPTH] 'Stop searching after reaching this backtracking depth'
             -u, --check-unique 'Keep searching for a second solution to prove uniqueness'
             --no-probe 'Disable probing'
             --no-backtrack 'Disable guess-and-backtrack'
             --probe-level=[N] 'Probe neighbourhood radius'
             --merge-probe=[BOOL] 'Merge probe siblings into guaranteed facts (default: true)'
             --exhaust 'Run the exhaustive line check before falling back to guessing'
             --rating=[POLICY] 'Cell rating policy: simple, ad-hoc, math'
             --colour-policy=[POLICY] 'Guess colour policy: max, min, random, contrast'",
        )
        .get_matches();

    let config = config_from_args(&matches);
    let content = content_from_args(&matches)?;

    let parsed = ClueText::parse(&content)?;
    let ncolors = parsed.ncolors();
    let mut puzzle = Puzzle::new(parsed.row_clues, parsed.col_clues, ncolors)
        .map_err(ParseError)?;

    match solve(&mut puzzle, &config) {
        Ok(report) => {
            let renderer = ShellRenderer::new(&puzzle, &parsed.palette);
            println!("{}", renderer.render());
            match report.status {
                SolveStatus::Unique => info!("unique solution, {:?}", report.stats),
                SolveStatus::Multiple => {
                    println!("Warning: this puzzle has more than one solution.")
                }
                SolveStatus::NoSolution => println!("No solution exists for this puzzle."),
            }
        }
        Err(e) => {
            warn!("search did not finish: {:?}", e);
            println!("Could not determine a solution: {:?}", e);
        }
    }

    Ok(())
}

fn content_from_args(matches: &ArgMatches) -> Result<String, ParseError> {
    if let Some(input_file) = matches.value_of("INPUT") {
        Ok(fs::read_to_string(input_file)?)
    } else {
        warn!("Reading from stdin...");
        let mut buffer = String::new();
        stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

fn parse_arg<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    if matches.is_present(name) {
        Some(value_t!(matches, name, T).unwrap_or_else(|e| e.exit()))
    } else {
        None
    }
}

fn config_from_args(matches: &ArgMatches) -> SolverConfig {
    let mut config = SolverConfig::default();

    if let Some(n) = parse_arg::<u32>(matches, "max-solutions") {
        config.max_solutions = n;
    }
    if let Some(ms) = parse_arg::<u64>(matches, "timeout") {
        config.timeout_ms = ms;
    }
    if let Some(d) = parse_arg::<u32>(matches, "max-depth") {
        config.max_depth = d;
    }
    if matches.is_present("check-unique") {
        config.check_unique = true;
    }
    if matches.is_present("no-probe") {
        config.allow_probe = false;
    }
    if matches.is_present("no-backtrack") {
        config.allow_backtrack = false;
    }
    if let Some(n) = parse_arg::<u32>(matches, "probe-level") {
        config.probe_level = n;
    }
    if let Some(v) = matches.value_of("merge-probe") {
        config.merge_probe = v != "false" && v != "0";
    }
    if matches.is_present("exhaust") {
        config.allow_exhaust = true;
    }
    if let Some(policy) = matches.value_of("rating") {
        config.rating_policy = match policy {
            "simple" => RatingPolicy::Simple,
            "math" => RatingPolicy::Math,
            _ => RatingPolicy::AdHoc,
        };
    }
    if let Some(policy) = matches.value_of("colour-policy") {
        config.colour_policy = match policy {
            "max" => ColourPolicy::Max,
            "min" => ColourPolicy::Min,
            "random" => ColourPolicy::Random,
            _ => ColourPolicy::Contrast,
        };
    }

    config
}
