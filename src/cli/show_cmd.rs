//! `boardlift show` — render a persisted board as a symbol grid.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cli::output::Styled;
use crate::persist::BoardStore;
use crate::summary::ColorMap;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Board size, e.g. 8 for the 8x8 set.
    size: u32,

    /// Level within that size.
    level: u32,

    /// Directory holding the board files.
    #[arg(long, default_value = "boards")]
    out: PathBuf,
}

pub fn run(args: ShowArgs, quiet: bool) -> Result<()> {
    let s = Styled::new();
    let store = BoardStore::new(&args.out);

    let cells = store.load(args.size, args.level)?;
    let map = ColorMap::new(args.size, &cells);

    print!("{}", map.render_grid());

    if !quiet {
        eprintln!();
        eprintln!(
            "  {}",
            s.bold(&format!("{0}x{0} level {1}", args.size, args.level))
        );
        eprintln!("  Cells:         {}", cells.len());
        eprintln!("  Unique colors: {}", map.groups().len());
        eprintln!();
        for group in map.groups() {
            eprintln!(
                "  {}  {:<24} {:>3} cells",
                group.symbol,
                group.color,
                group.cells.len()
            );
        }
    }
    Ok(())
}
