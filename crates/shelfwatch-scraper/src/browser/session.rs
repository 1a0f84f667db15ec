use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use shelfwatch_core::AppConfig;

use crate::error::ScrapeError;
use crate::retry::retry_with_backoff;

/// Well-known install locations, checked when no binary is configured.
const CHROME_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/snap/chromium/current/usr/lib/chromium-browser/chrome",
];

const SELECTOR_POLL: Duration = Duration::from_millis(250);

fn find_chrome_binary(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!(
            binary = %path.display(),
            "configured chrome binary does not exist, falling back to candidates"
        );
    }

    CHROME_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// One Chromium process with a single page, exclusively owned for the
/// lifetime of a run. All storefront interaction goes through this handle;
/// dropping or closing it tears the browser down.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    event_loop: JoinHandle<()>,
    nav_timeout: Duration,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BrowserSession {
    /// Launches Chromium and opens a blank page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::NoBrowserBinary`] when no usable binary is
    /// found, or [`ScrapeError::Init`] when the process fails to start.
    pub async fn launch(config: &AppConfig) -> Result<Self, ScrapeError> {
        let binary = find_chrome_binary(config.chrome_binary.as_deref())
            .ok_or(ScrapeError::NoBrowserBinary)?;
        info!(
            binary = %binary.display(),
            headless = config.headless,
            "launching chromium"
        );

        let (width, height) = config.viewport;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(binary)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-sandbox")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--window-size={width},{height}"));
        if config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(|reason| ScrapeError::Init { reason })?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Init {
                reason: e.to_string(),
            })?;

        // The handler future must be polled for the websocket to make
        // progress; it runs until the browser process goes away.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
            debug!("chromium event loop exited");
        });

        let page = browser.new_page("about:blank").await?;
        page.set_user_agent(config.user_agent.as_str()).await?;

        Ok(Self {
            browser,
            page,
            event_loop,
            nav_timeout: Duration::from_secs(config.nav_timeout_secs),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        })
    }

    /// The session's single page. Interceptors attach their listeners here.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigates to `url`, retrying transient failures with backoff.
    pub async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.navigate_once(url)
        })
        .await
    }

    async fn navigate_once(&self, url: &str) -> Result<(), ScrapeError> {
        debug!(url, "navigating");
        match tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {
                // Storefronts keep streaming assets long after the document is
                // usable; a lagging load event is not a navigation failure.
                let _ = tokio::time::timeout(self.nav_timeout, self.page.wait_for_navigation())
                    .await;
                Ok(())
            }
            Ok(Err(e)) => Err(ScrapeError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScrapeError::Navigation {
                url: url.to_owned(),
                reason: format!("timed out after {}s", self.nav_timeout.as_secs()),
            }),
        }
    }

    /// Polls the page for the first selector in `selectors` that resolves to
    /// an element, giving up after `wait`. Returns the winning selector with
    /// the element so callers can log which affordance matched.
    pub async fn find_first_element<'s>(
        &self,
        selectors: &[&'s str],
        wait: Duration,
    ) -> Option<(&'s str, Element)> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            for selector in selectors {
                if let Ok(element) = self.page.find_element(*selector).await {
                    return Some((*selector, element));
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    }

    /// Shuts the browser down. Safe to call as the final use of the session;
    /// the event loop task is aborted on drop.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "browser process wait failed");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.event_loop.abort();
    }
}
