//! Sequential harvest over the configured plan.
//!
//! For every size in the plan, for every level `1..=max`, the harvester
//! extracts the board and persists it. Strictly one page at a time; the
//! loop position is the only state. The first fault aborts the remaining
//! enumeration with context naming the failing pair — the caller still
//! owns the renderer and shuts it down on that path too.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use url::Url;

use crate::extraction::{BoardCell, BoardExtractor};
use crate::persist::BoardStore;
use crate::renderer::Renderer;

/// Which board sizes to harvest, and how many levels each has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestPlan {
    /// `(size, level_count)` entries, ascending by size.
    entries: Vec<(u32, u32)>,
}

impl HarvestPlan {
    /// The full plan of the puzzle site: all published sizes and levels.
    pub fn default_plan() -> Self {
        Self::new(vec![(7, 50), (8, 130), (9, 110), (10, 60), (11, 50)])
    }

    pub fn new(mut entries: Vec<(u32, u32)>) -> Self {
        entries.sort_by_key(|&(size, _)| size);
        entries.dedup_by_key(|&mut (size, _)| size);
        Self { entries }
    }

    /// Parse a `SIZE=LEVELS` CLI entry, e.g. `8=130`.
    pub fn parse_entry(s: &str) -> Result<(u32, u32), String> {
        let (size, levels) = s
            .split_once('=')
            .ok_or_else(|| format!("expected SIZE=LEVELS, got {s:?}"))?;
        let size: u32 = size
            .trim()
            .parse()
            .map_err(|_| format!("invalid size {size:?}"))?;
        let levels: u32 = levels
            .trim()
            .parse()
            .map_err(|_| format!("invalid level count {levels:?}"))?;
        if size == 0 || levels == 0 {
            return Err("size and level count must be positive".to_string());
        }
        Ok((size, levels))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of boards the plan will produce.
    pub fn total_levels(&self) -> u64 {
        self.entries.iter().map(|&(_, levels)| levels as u64).sum()
    }
}

/// Injected configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: Url,
    pub out_dir: PathBuf,
    pub plan: HarvestPlan,
    pub nav_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub ready_timeout_ms: u64,
}

/// Counters reported after a completed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarvestOutcome {
    pub boards: u64,
    pub cells: u64,
    pub empty_boards: u64,
}

/// The enumeration loop: extractor plus store over a plan.
pub struct Harvester {
    plan: HarvestPlan,
    extractor: BoardExtractor,
    store: BoardStore,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Self {
        let extractor = BoardExtractor::new(
            config.base_url,
            config.nav_timeout_ms,
            config.poll_interval_ms,
            config.ready_timeout_ms,
        );
        Self {
            plan: config.plan,
            extractor,
            store: BoardStore::new(config.out_dir),
        }
    }

    /// Run the full enumeration. `on_saved` fires once per persisted file
    /// so the CLI can print its per-file notice and advance a progress bar.
    pub async fn run(
        &self,
        renderer: &dyn Renderer,
        on_saved: &mut dyn FnMut(u32, u32, &Path, usize),
    ) -> Result<HarvestOutcome> {
        if self.plan.is_empty() {
            bail!("harvest plan is empty");
        }

        let mut outcome = HarvestOutcome::default();
        for (size, max_level) in self.plan.iter() {
            info!(size, levels = max_level, "harvesting size");
            for level in 1..=max_level {
                let cells = self
                    .harvest_one(renderer, size, level)
                    .await
                    .with_context(|| format!("harvesting {size}x{size} level {level}"))?;

                if cells.is_empty() {
                    warn!(size, level, "no cells matched; writing empty board");
                    outcome.empty_boards += 1;
                }

                let path = self
                    .store
                    .save(size, level, &cells)
                    .with_context(|| format!("persisting {size}x{size} level {level}"))?;

                outcome.boards += 1;
                outcome.cells += cells.len() as u64;
                on_saved(size, level, &path, cells.len());
            }
        }

        info!(
            boards = outcome.boards,
            cells = outcome.cells,
            "harvest complete"
        );
        Ok(outcome)
    }

    /// Extract one board in a fresh page context, closing it either way.
    async fn harvest_one(
        &self,
        renderer: &dyn Renderer,
        size: u32,
        level: u32,
    ) -> Result<Vec<BoardCell>> {
        let context = renderer
            .new_context()
            .await
            .context("creating browser context")?;
        let result = self.extractor.extract(context.as_ref(), size, level).await;
        if let Err(e) = context.close().await {
            warn!(size, level, "page close failed: {e}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderContext;
    use async_trait::async_trait;
    use serde_json::json;

    /// Renderer whose pages all expose the same two-cell board.
    struct MockRenderer;

    struct MockContext;

    #[async_trait]
    impl Renderer for MockRenderer {
        async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
            Ok(Box::new(MockContext))
        }
    }

    #[async_trait]
    impl RenderContext for MockContext {
        async fn navigate(&self, _url: &str, _timeout_ms: u64) -> Result<()> {
            Ok(())
        }

        async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
            if script.trim_start().starts_with("document.querySelectorAll") {
                return Ok(json!(2));
            }
            Ok(json!([
                {"row": "0", "col": "1", "color": "rgb(0, 0, 255)"},
                {"row": "0", "col": "0", "color": "rgb(255, 0, 0)"},
            ]))
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn config(out_dir: PathBuf, plan: HarvestPlan) -> HarvestConfig {
        HarvestConfig {
            base_url: Url::parse("https://www.playqueensgame.com").unwrap(),
            out_dir,
            plan,
            nav_timeout_ms: 1_000,
            poll_interval_ms: 1,
            ready_timeout_ms: 50,
        }
    }

    #[test]
    fn parse_entry_accepts_size_equals_levels() {
        assert_eq!(HarvestPlan::parse_entry("8=130"), Ok((8, 130)));
        assert!(HarvestPlan::parse_entry("8").is_err());
        assert!(HarvestPlan::parse_entry("0=5").is_err());
        assert!(HarvestPlan::parse_entry("8=x").is_err());
    }

    #[test]
    fn default_plan_covers_all_sizes() {
        let plan = HarvestPlan::default_plan();
        assert_eq!(plan.total_levels(), 50 + 130 + 110 + 60 + 50);
        let sizes: Vec<u32> = plan.iter().map(|(size, _)| size).collect();
        assert_eq!(sizes, vec![7, 8, 9, 10, 11]);
    }

    #[test]
    fn plan_sorts_and_dedups_sizes() {
        let plan = HarvestPlan::new(vec![(9, 10), (7, 5), (9, 20)]);
        let entries: Vec<(u32, u32)> = plan.iter().collect();
        assert_eq!(entries, vec![(7, 5), (9, 10)]);
    }

    #[tokio::test]
    async fn run_persists_every_level_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let harvester = Harvester::new(config(
            dir.path().to_path_buf(),
            HarvestPlan::new(vec![(7, 2), (8, 1)]),
        ));

        let mut saved = Vec::new();
        let outcome = harvester
            .run(&MockRenderer, &mut |size, level, _path, cells| {
                saved.push((size, level, cells));
            })
            .await
            .unwrap();

        assert_eq!(outcome.boards, 3);
        assert_eq!(outcome.cells, 6);
        assert_eq!(outcome.empty_boards, 0);
        assert_eq!(saved, vec![(7, 1, 2), (7, 2, 2), (8, 1, 2)]);

        // Files exist and contain the sorted board.
        let store = BoardStore::new(dir.path());
        let cells = store.load(7, 2).unwrap();
        assert_eq!((cells[0].row, cells[0].col), (0, 0));
        assert_eq!((cells[1].row, cells[1].col), (0, 1));
    }

    /// Renderer whose contexts always fail to close.
    struct LeakyRenderer;

    struct LeakyContext;

    #[async_trait]
    impl Renderer for LeakyRenderer {
        async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
            Ok(Box::new(LeakyContext))
        }
    }

    #[async_trait]
    impl RenderContext for LeakyContext {
        async fn navigate(&self, _url: &str, _timeout_ms: u64) -> Result<()> {
            Ok(())
        }

        async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
            if script.trim_start().starts_with("document.querySelectorAll") {
                return Ok(json!(1));
            }
            Ok(json!([{"row": "0", "col": "0", "color": "rgb(1, 1, 1)"}]))
        }

        async fn close(self: Box<Self>) -> Result<()> {
            anyhow::bail!("target already gone")
        }
    }

    #[tokio::test]
    async fn close_failure_does_not_abort_the_harvest() {
        let dir = tempfile::tempdir().unwrap();
        let harvester = Harvester::new(config(
            dir.path().to_path_buf(),
            HarvestPlan::new(vec![(7, 2)]),
        ));

        let outcome = harvester
            .run(&LeakyRenderer, &mut |_, _, _, _| {})
            .await
            .unwrap();

        assert_eq!(outcome.boards, 2);
        assert_eq!(BoardStore::new(dir.path()).load(7, 2).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_plan_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let harvester =
            Harvester::new(config(dir.path().to_path_buf(), HarvestPlan::new(vec![])));

        let err = harvester
            .run(&MockRenderer, &mut |_, _, _, _| {})
            .await
            .unwrap_err();
        assert!(err.to_string().contains("plan is empty"));
    }
}
