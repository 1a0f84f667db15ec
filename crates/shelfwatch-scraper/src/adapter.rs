//! Capability interface for platform adapters and the closed registry.

use async_trait::async_trait;

use shelfwatch_core::{AppConfig, Platform};

use crate::browser::CapturedResponse;
use crate::error::ScrapeError;
use crate::platforms::{blinkit, zepto, ParsedListing};
use crate::site::SiteAdapter;

/// What a run needs from a platform: session bring-up, navigation, region
/// selection, a search that yields captured backend responses, pure payload
/// mapping, and idempotent teardown.
///
/// Methods are expected in order: `initialize`, `navigate_to_site`, then per
/// task `set_location` / `search_for_keyword` / `extract_data`, and finally
/// `close`. Calling anything but `initialize` or `close` on an uninitialized
/// adapter is an error, not a panic.
#[async_trait]
pub trait PlatformAdapter: Send {
    fn platform(&self) -> Platform;

    /// Brings the browser session up. Failure here is fatal for the session.
    async fn initialize(&mut self) -> Result<(), ScrapeError>;

    async fn navigate_to_site(&mut self) -> Result<(), ScrapeError>;

    /// Applies a delivery region. Absence of any location prompt is a
    /// successful no-op; the region is still recorded for task attribution.
    async fn set_location(&mut self, region: &str) -> Result<(), ScrapeError>;

    /// Drives one search and returns the backend responses captured for it,
    /// in arrival order. Zero captures is a valid empty result.
    async fn search_for_keyword(
        &mut self,
        keyword: &str,
    ) -> Result<Vec<CapturedResponse>, ScrapeError>;

    /// Pure payload mapping; no browser interaction.
    fn extract_data(&self, capture: &CapturedResponse) -> Vec<ParsedListing>;

    /// Releases the browser. Idempotent.
    async fn close(&mut self) -> Result<(), ScrapeError>;
}

type AdapterCtor = fn(AppConfig) -> Box<dyn PlatformAdapter>;

fn constructor_for(platform: Platform) -> AdapterCtor {
    match platform {
        Platform::Zepto => |config| Box::new(SiteAdapter::new(zepto::profile(), config)),
        Platform::Blinkit => |config| Box::new(SiteAdapter::new(blinkit::profile(), config)),
    }
}

/// Explicit, constructed-once mapping from platform to adapter constructor.
/// Passed by reference to whoever needs it; there is no ambient global.
pub struct AdapterRegistry {
    entries: Vec<(Platform, AdapterCtor)>,
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Platform::ALL
                .into_iter()
                .map(|platform| (platform, constructor_for(platform)))
                .collect(),
        }
    }

    /// Builds the adapter for `platform`. The platform set is closed, so
    /// lookup is total.
    #[must_use]
    pub fn create(&self, platform: Platform, config: AppConfig) -> Box<dyn PlatformAdapter> {
        let ctor = self
            .entries
            .iter()
            .find_map(|(p, ctor)| (*p == platform).then_some(*ctor))
            .unwrap_or_else(|| constructor_for(platform));
        ctor(config)
    }

    /// The platforms this registry can build, in declaration order.
    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.entries.iter().map(|(platform, _)| *platform)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
