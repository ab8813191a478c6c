use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt as _;
use url::Url;

/// One rendered-page session: the crawl engine drives it strictly
/// sequentially, one URL at a time.
#[async_trait]
pub trait PageRenderer {
    /// Navigates the page to `url`, failing if the navigation does not
    /// complete within `timeout`.
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> anyhow::Result<()>;

    /// Waits until the page reports no further network activity, the
    /// heuristic for "fully loaded".
    async fn wait_for_quiescence(&mut self, timeout: Duration) -> anyhow::Result<()>;

    /// Returns the rendered markup of the current page.
    async fn content(&mut self) -> anyhow::Result<String>;
}

/// Headless-Chrome renderer. One browser and one page are launched per crawl
/// run and closed when the run ends, on all paths.
pub struct ChromeRenderer {
    browser: Browser,
    page: chromiumoxide::Page,
    event_loop: tokio::task::JoinHandle<()>,
}

impl ChromeRenderer {
    pub async fn launch() -> anyhow::Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(|err| anyhow::anyhow!("build browser config: {err}"))?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .context("launch headless chrome")?;

        let event_loop = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("open browser page")?;

        Ok(Self {
            browser,
            page,
            event_loop,
        })
    }

    /// Best-effort shutdown; a browser that refuses to close is logged, not
    /// escalated, since the run's result is already decided by this point.
    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            tracing::debug!(?err, "browser close failed");
        }
        let _ = self.browser.wait().await;
        self.event_loop.abort();
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> anyhow::Result<()> {
        tokio::time::timeout(timeout, self.page.goto(url.as_str()))
            .await
            .map_err(|_| anyhow::anyhow!("navigation timed out after {}s", timeout.as_secs()))?
            .with_context(|| format!("navigate: {url}"))?;
        Ok(())
    }

    async fn wait_for_quiescence(&mut self, timeout: Duration) -> anyhow::Result<()> {
        tokio::time::timeout(timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| {
                anyhow::anyhow!("page did not settle within {}s", timeout.as_secs())
            })?
            .context("wait for page to settle")?;
        Ok(())
    }

    async fn content(&mut self) -> anyhow::Result<String> {
        self.page.content().await.context("read rendered markup")
    }
}
