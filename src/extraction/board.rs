//! Extract one puzzle board from a rendered page.
//!
//! Cells are `div` elements carrying `data-row`/`data-col` attributes;
//! the displayed color is the computed `background-color`. Readiness is
//! polled rather than slept for: the extractor re-checks the matching
//! element count at a fixed interval until cells appear or a bounded
//! deadline elapses.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::renderer::RenderContext;

/// CSS selector identifying board cells.
const CELL_SELECTOR: &str = "div[data-row][data-col]";

/// Counts elements matching the cell selector.
const COUNT_SCRIPT: &str =
    r#"document.querySelectorAll('div[data-row][data-col]').length"#;

/// Collects row/col attributes and resolved background colors for every
/// cell, in DOM order.
const COLLECT_SCRIPT: &str = r#"
(function () {
    var out = [];
    var nodes = document.querySelectorAll('div[data-row][data-col]');
    for (var i = 0; i < nodes.length; i++) {
        var el = nodes[i];
        out.push({
            row: el.getAttribute('data-row'),
            col: el.getAttribute('data-col'),
            color: window.getComputedStyle(el).backgroundColor
        });
    }
    return out;
})()
"#;

/// A single board position with its resolved display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    pub row: u32,
    pub col: u32,
    /// CSS color as the browser reports it, e.g. `rgb(187, 163, 226)`.
    pub color: String,
}

/// Faults the extractor can distinguish.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("non-numeric {name} attribute: {value:?}")]
    BadAttribute { name: &'static str, value: String },

    #[error("cell collection returned a non-array value: {0}")]
    NotAnArray(String),
}

/// Extracts sorted boards from puzzle pages.
pub struct BoardExtractor {
    base_url: Url,
    nav_timeout_ms: u64,
    poll_interval: Duration,
    ready_timeout: Duration,
}

impl BoardExtractor {
    pub fn new(
        base_url: Url,
        nav_timeout_ms: u64,
        poll_interval_ms: u64,
        ready_timeout_ms: u64,
    ) -> Self {
        Self {
            base_url,
            nav_timeout_ms,
            poll_interval: Duration::from_millis(poll_interval_ms),
            ready_timeout: Duration::from_millis(ready_timeout_ms),
        }
    }

    /// URL of the puzzle page for `(size, level)`.
    pub fn page_url(&self, size: u32, level: u32) -> String {
        format!(
            "{}/puzzles/{size}x{size}/{level}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Navigate to the `(size, level)` page and produce its sorted board.
    ///
    /// A readiness deadline that expires with zero matching cells yields
    /// an empty board; the caller decides how loudly to surface that.
    pub async fn extract(
        &self,
        context: &dyn RenderContext,
        size: u32,
        level: u32,
    ) -> Result<Vec<BoardCell>> {
        let url = self.page_url(size, level);
        context.navigate(&url, self.nav_timeout_ms).await?;

        let count = self.wait_for_cells(context).await?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let raw = context
            .execute_js(COLLECT_SCRIPT)
            .await
            .context("collecting board cells")?;
        let cells = parse_cells(raw)?;
        debug!(size, level, cells = cells.len(), "extracted board");
        Ok(cells)
    }

    /// Poll the cell count until non-zero or the deadline passes.
    async fn wait_for_cells(&self, context: &dyn RenderContext) -> Result<u64> {
        let deadline = Instant::now() + self.ready_timeout;
        loop {
            let count = context
                .execute_js(COUNT_SCRIPT)
                .await
                .with_context(|| format!("counting {CELL_SELECTOR} elements"))?
                .as_u64()
                .unwrap_or(0);
            if count > 0 {
                return Ok(count);
            }
            if Instant::now() >= deadline {
                return Ok(0);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Normalize the collection script's output into sorted cells.
///
/// Sort is ascending by `(row, col)` regardless of DOM order. Duplicate
/// positions are kept so the output mirrors the page, but they are
/// surfaced in the log.
fn parse_cells(value: serde_json::Value) -> Result<Vec<BoardCell>, ExtractError> {
    let Some(items) = value.as_array() else {
        return Err(ExtractError::NotAnArray(value.to_string()));
    };

    let mut cells = Vec::with_capacity(items.len());
    for item in items {
        let row = parse_index(item.get("row"), "data-row")?;
        let col = parse_index(item.get("col"), "data-col")?;
        let color = item
            .get("color")
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();
        cells.push(BoardCell { row, col, color });
    }

    cells.sort_by_key(|c| (c.row, c.col));

    for pair in cells.windows(2) {
        if pair[0].row == pair[1].row && pair[0].col == pair[1].col {
            warn!(
                row = pair[0].row,
                col = pair[0].col,
                "duplicate cell position on page"
            );
        }
    }

    Ok(cells)
}

/// Read a row/col index from the script output. Attribute values arrive
/// as strings; plain numbers are accepted too.
fn parse_index(
    value: Option<&serde_json::Value>,
    name: &'static str,
) -> Result<u32, ExtractError> {
    let bad = |value: String| ExtractError::BadAttribute { name, value };

    let Some(value) = value else {
        return Err(bad("<missing>".to_string()));
    };
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(|_| bad(n.to_string()));
    }
    if let Some(s) = value.as_str() {
        return s.trim().parse().map_err(|_| bad(s.to_string()));
    }
    Err(bad(value.to_string()))
}
