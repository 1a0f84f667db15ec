//! Browser-backed platform adapter, parameterized per storefront profile.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::{debug, info, warn};

use shelfwatch_core::{AppConfig, Platform, SearchTask};

use crate::adapter::PlatformAdapter;
use crate::browser::{BrowserSession, CapturedResponse, ResponseInterceptor};
use crate::error::ScrapeError;
use crate::platforms::ParsedListing;

/// Pure payload mapper for one platform.
pub type ParseFn = fn(&str) -> Vec<ParsedListing>;

/// Everything that differs between storefronts: where to go, what to click,
/// which backend endpoints to watch, and how to read their payloads.
#[derive(Debug, Clone, Copy)]
pub struct SiteProfile {
    pub platform: Platform,
    pub base_url: &'static str,
    /// `{query}` is replaced with the percent-encoded keyword. Empty means
    /// the storefront has no stable search URL and the UI path is the only
    /// way in.
    pub search_url_template: &'static str,
    /// Anchors that open the search surface; clicked before typing.
    pub search_trigger_selectors: &'static [&'static str],
    /// Inputs that take the keyword directly.
    pub search_input_selectors: &'static [&'static str],
    /// Inputs revealed after clicking a trigger.
    pub revealed_input_selectors: &'static [&'static str],
    pub location_button_selectors: &'static [&'static str],
    pub location_input_selectors: &'static [&'static str],
    pub api_url_patterns: &'static [&'static str],
    pub parse: ParseFn,
}

const LOCATION_SETTLE: Duration = Duration::from_millis(1200);

/// One browser-backed adapter covers every storefront; platforms differ only
/// by their [`SiteProfile`].
pub struct SiteAdapter {
    profile: SiteProfile,
    config: AppConfig,
    session: Option<BrowserSession>,
    interceptor: Option<ResponseInterceptor>,
    current_region: Option<String>,
}

impl SiteAdapter {
    #[must_use]
    pub fn new(profile: SiteProfile, config: AppConfig) -> Self {
        Self {
            profile,
            config,
            session: None,
            interceptor: None,
            current_region: None,
        }
    }

    fn session(&self) -> Result<&BrowserSession, ScrapeError> {
        self.session.as_ref().ok_or_else(|| ScrapeError::Init {
            reason: "adapter used before initialize".to_owned(),
        })
    }

    fn interceptor(&self) -> Result<&ResponseInterceptor, ScrapeError> {
        self.interceptor.as_ref().ok_or_else(|| ScrapeError::Init {
            reason: "adapter used before initialize".to_owned(),
        })
    }

    fn selector_wait(&self) -> Duration {
        Duration::from_secs(self.config.selector_wait_secs)
    }

    /// Types the keyword into the storefront's search UI, preferring visible
    /// affordances and falling back to direct URL navigation when none are
    /// found. Either path triggers the same backend search call.
    async fn submit_search(&self, keyword: &str) -> Result<(), ScrapeError> {
        let session = self.session()?;
        let wait = self.selector_wait();

        if let Some((selector, trigger)) = session
            .find_first_element(self.profile.search_trigger_selectors, wait)
            .await
        {
            debug!(selector, "search trigger found, opening search surface");
            trigger.click().await?;

            if let Some((selector, input)) = session
                .find_first_element(self.profile.revealed_input_selectors, wait)
                .await
            {
                debug!(selector, "revealed search input found");
                input.click().await?;
                input.type_str(keyword).await?;
                input.press_key("Enter").await?;
                return Ok(());
            }
            warn!("no input appeared after opening search, trying direct inputs");
        }

        if let Some((selector, input)) = session
            .find_first_element(self.profile.search_input_selectors, wait)
            .await
        {
            debug!(selector, "search input found");
            input.click().await?;
            input.type_str(keyword).await?;
            input.press_key("Enter").await?;
            return Ok(());
        }

        if self.profile.search_url_template.is_empty() {
            return Err(ScrapeError::MissingSearchEntry {
                url: self.profile.base_url.to_owned(),
            });
        }
        let query = utf8_percent_encode(keyword, NON_ALPHANUMERIC).to_string();
        let url = self.profile.search_url_template.replace("{query}", &query);
        warn!(url, "no search affordance found, navigating directly");
        session.goto(&url).await
    }

    /// Attempts to drive the storefront's location picker. `Ok(false)` means
    /// no prompt (or no input behind it) appeared within the bounded wait,
    /// which callers treat as a successful no-op.
    async fn drive_location_picker(&self, region: &str) -> Result<bool, ScrapeError> {
        let session = self.session()?;
        let wait = self.selector_wait();

        let Some((selector, button)) = session
            .find_first_element(self.profile.location_button_selectors, wait)
            .await
        else {
            return Ok(false);
        };
        debug!(selector, "location prompt found");
        button.click().await?;

        let Some((selector, input)) = session
            .find_first_element(self.profile.location_input_selectors, wait)
            .await
        else {
            debug!("location prompt did not reveal an input");
            return Ok(false);
        };
        debug!(selector, "location input found");
        input.click().await?;
        input.type_str(region).await?;
        input.press_key("Enter").await?;

        // Give the storefront a moment to re-render for the new region.
        tokio::time::sleep(LOCATION_SETTLE).await;
        Ok(true)
    }
}

#[async_trait]
impl PlatformAdapter for SiteAdapter {
    fn platform(&self) -> Platform {
        self.profile.platform
    }

    async fn initialize(&mut self) -> Result<(), ScrapeError> {
        if self.session.is_some() {
            return Ok(());
        }
        info!(platform = %self.profile.platform, "initializing adapter");
        let session = BrowserSession::launch(&self.config).await?;
        let patterns: Vec<String> = self
            .profile
            .api_url_patterns
            .iter()
            .map(|pattern| (*pattern).to_string())
            .collect();
        let interceptor = ResponseInterceptor::attach(session.page(), &patterns).await?;
        self.session = Some(session);
        self.interceptor = Some(interceptor);
        Ok(())
    }

    async fn navigate_to_site(&mut self) -> Result<(), ScrapeError> {
        self.session()?.goto(self.profile.base_url).await
    }

    async fn set_location(&mut self, region: &str) -> Result<(), ScrapeError> {
        self.session()?;
        self.current_region = Some(region.to_owned());

        match self.drive_location_picker(region).await {
            Ok(true) => {
                info!(region, "region applied");
                Ok(())
            }
            Ok(false) => {
                debug!(region, "no location prompt, keeping storefront default");
                Ok(())
            }
            Err(e) => Err(ScrapeError::Location {
                region: region.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn search_for_keyword(
        &mut self,
        keyword: &str,
    ) -> Result<Vec<CapturedResponse>, ScrapeError> {
        let task = SearchTask::new(keyword, self.current_region.clone().unwrap_or_default());
        info!(task = %task, platform = %self.profile.platform, "searching");

        self.interceptor()?.begin_task(&task).await;
        self.submit_search(keyword).await?;

        let captured = self
            .interceptor()?
            .wait_for_quiescence(
                Duration::from_secs(self.config.capture_wait_secs),
                Duration::from_millis(self.config.capture_idle_ms),
            )
            .await;
        if captured == 0 {
            info!(task = %task, "no matching backend response (empty result)");
        } else {
            debug!(task = %task, captured, "capture settled");
        }
        Ok(self.interceptor()?.drain().await)
    }

    fn extract_data(&self, capture: &CapturedResponse) -> Vec<ParsedListing> {
        (self.profile.parse)(&capture.body)
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        // Listeners stop before the page goes away.
        self.interceptor = None;
        if let Some(session) = self.session.take() {
            session.close().await;
        }
        Ok(())
    }
}
