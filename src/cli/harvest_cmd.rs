//! `boardlift harvest` — enumerate the plan and persist every board.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use crate::cli::output::Styled;
use crate::harvest::{HarvestConfig, HarvestPlan, Harvester};
use crate::renderer::ChromiumRenderer;

#[derive(Debug, Args)]
pub struct HarvestArgs {
    /// Output directory for board files.
    #[arg(long, default_value = "boards")]
    out: PathBuf,

    /// Base URL of the puzzle site.
    #[arg(long, default_value = "https://www.playqueensgame.com")]
    base_url: Url,

    /// Plan entry as SIZE=LEVELS (repeatable). Defaults to the full
    /// built-in plan when omitted.
    #[arg(long = "plan", value_name = "SIZE=LEVELS", value_parser = HarvestPlan::parse_entry)]
    plan: Vec<(u32, u32)>,

    /// Navigation timeout per page, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    nav_timeout_ms: u64,

    /// Interval between board-readiness polls, in milliseconds.
    #[arg(long, default_value_t = 250)]
    poll_interval_ms: u64,

    /// Deadline for the first board cell to appear, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    ready_timeout_ms: u64,
}

pub async fn run(args: HarvestArgs, quiet: bool) -> Result<()> {
    let s = Styled::new();
    let start = Instant::now();

    let plan = if args.plan.is_empty() {
        HarvestPlan::default_plan()
    } else {
        HarvestPlan::new(args.plan)
    };
    let total = plan.total_levels();

    let harvester = Harvester::new(HarvestConfig {
        base_url: args.base_url,
        out_dir: args.out,
        plan,
        nav_timeout_ms: args.nav_timeout_ms,
        poll_interval_ms: args.poll_interval_ms,
        ready_timeout_ms: args.ready_timeout_ms,
    });

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total);
        bar.set_style(ProgressStyle::with_template(
            "  {bar:30} {pos}/{len} boards",
        )?);
        bar
    };

    let renderer = ChromiumRenderer::launch()
        .await
        .context("starting browser")?;

    let mut on_saved = |_size: u32, _level: u32, path: &std::path::Path, cells: usize| {
        if !quiet {
            bar.println(format!("  {} saved {} ({cells} cells)", s.ok_sym(), path.display()));
        }
        bar.inc(1);
    };
    let result = harvester.run(&renderer, &mut on_saved).await;

    // Release the browser before surfacing any harvest fault.
    renderer.shutdown().await.context("closing browser")?;
    bar.finish_and_clear();

    let outcome = result?;
    if !quiet {
        eprintln!();
        eprintln!(
            "  {} harvested {} boards ({} cells) in {:.1}s",
            s.ok_sym(),
            outcome.boards,
            outcome.cells,
            start.elapsed().as_secs_f64()
        );
        if outcome.empty_boards > 0 {
            eprintln!(
                "  {} {} boards matched no cells",
                s.warn_sym(),
                outcome.empty_boards
            );
        }
    }
    Ok(())
}
