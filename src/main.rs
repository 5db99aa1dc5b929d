use anyhow::Result;
use clap::{Parser, Subcommand};

use boardlift::cli::{harvest_cmd, show_cmd, solve_cmd};

#[derive(Parser)]
#[command(
    name = "boardlift",
    version,
    about = "Extract puzzle-board color grids from the web into JSON files"
)]
struct Cli {
    /// Suppress progress output and per-file notices.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Harvest every configured (size, level) board into JSON files.
    Harvest(harvest_cmd::HarvestArgs),
    /// Print the symbol grid and color summary of a persisted board.
    Show(show_cmd::ShowArgs),
    /// Solve a persisted board: one queen per row, column, and color,
    /// no two queens adjacent.
    Solve(solve_cmd::SolveArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("boardlift=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Harvest(args) => harvest_cmd::run(args, cli.quiet).await,
        Command::Show(args) => show_cmd::run(args, cli.quiet),
        Command::Solve(args) => solve_cmd::run(args, cli.quiet),
    }
}
