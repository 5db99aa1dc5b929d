//! chromiumoxide-backed renderer.
//!
//! Launches one headless Chromium process for the whole run. The CDP
//! event handler must be polled continuously for the browser to make
//! progress, so it is driven on a spawned task.

use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{RenderContext, Renderer};

/// Shared headless browser session.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
}

impl ChromiumRenderer {
    /// Launch a headless Chromium and start driving its CDP event loop.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| anyhow!("browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("launching headless Chromium")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler stopped: {e}");
                    break;
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task,
        })
    }

    /// Close the browser process. Called exactly once, on every exit path
    /// of the harvest, success or fault.
    pub async fn shutdown(self) -> Result<()> {
        let mut browser = self.browser.into_inner();
        if let Err(e) = browser.close().await {
            warn!("browser close failed: {e}");
        }
        let _ = browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let browser = self.browser.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .context("opening browser page")?;
        Ok(Box::new(ChromiumContext { page }))
    }
}

struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()> {
        let nav = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            anyhow::Ok(())
        })
        .await;

        match nav {
            Ok(result) => result.with_context(|| format!("navigating to {url}")),
            Err(_) => bail!("navigation to {url} timed out after {timeout_ms}ms"),
        }
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("evaluating script in page")?;
        result.into_value().context("decoding script result")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.context("closing page")?;
        Ok(())
    }
}
