//! `boardlift solve` — solve a persisted board with the backtracking solver.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use crate::cli::output::Styled;
use crate::persist::BoardStore;
use crate::solver::BacktrackingSolver;
use crate::summary::ColorMap;

#[derive(Debug, Args)]
pub struct SolveArgs {
    /// Board size, e.g. 8 for the 8x8 set.
    size: u32,

    /// Level within that size.
    level: u32,

    /// Directory holding the board files.
    #[arg(long, default_value = "boards")]
    out: PathBuf,
}

pub fn run(args: SolveArgs, quiet: bool) -> Result<()> {
    let s = Styled::new();
    let store = BoardStore::new(&args.out);

    let cells = store.load(args.size, args.level)?;
    let map = ColorMap::new(args.size, &cells);

    if !quiet {
        eprintln!(
            "  Solving {0}x{0} level {1} ({2} colors)...",
            args.size,
            args.level,
            map.groups().len()
        );
    }

    let start = Instant::now();
    let mut solver = BacktrackingSolver::new(&map);
    let solution = solver.solve();
    let stats = solver.stats();

    match solution {
        Some(solution) => {
            print!("{}", solution.render(&map));
            if !quiet {
                eprintln!();
                for queen in &solution.queens {
                    eprintln!(
                        "  {}  queen at [{}, {}]  {}",
                        queen.symbol, queen.row, queen.col, queen.color
                    );
                }
                eprintln!();
                eprintln!(
                    "  {} solved in {:.1}ms ({} steps, {} backtracks)",
                    s.ok_sym(),
                    start.elapsed().as_secs_f64() * 1000.0,
                    stats.steps,
                    stats.backtracks
                );
            }
        }
        None => {
            eprintln!(
                "  {} no solution ({} steps, {} backtracks)",
                s.warn_sym(),
                stats.steps,
                stats.backtracks
            );
        }
    }
    Ok(())
}
