//! Browser rendering seam.
//!
//! Harvesting logic talks to the browser through these traits so it can
//! be exercised against a mock page source in tests. The chromiumoxide
//! implementation lives in [`chromium`].

use anyhow::Result;
use async_trait::async_trait;

pub mod chromium;

pub use chromium::ChromiumRenderer;

/// A single page-level browsing context.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Drive the page to `url`, bounded by `timeout_ms`. A load that has
    /// not settled by the deadline is an error, not a hang.
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()>;

    /// Evaluate JavaScript in the page and return its JSON result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;

    /// Close the underlying page/target.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Factory for render contexts backed by one shared browser.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
}
