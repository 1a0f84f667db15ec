use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser session failed to start: {reason}")]
    Init { reason: String },

    #[error("no Chromium binary found; set SHELFWATCH_CHROME_BIN or install google-chrome/chromium")]
    NoBrowserBinary,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("could not apply region {region}: {reason}")]
    Location { region: String, reason: String },

    #[error("search for \"{keyword}\" captured no backend response within {waited_secs}s")]
    SearchTimeout { keyword: String, waited_secs: u64 },

    #[error("no usable search entry point on {url}")]
    MissingSearchEntry { url: String },

    #[error("response interceptor failure: {reason}")]
    Interceptor { reason: String },

    #[error("browser protocol error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}

impl ScrapeError {
    /// Errors that doom the whole run rather than a single task: there is no
    /// point continuing the matrix without a working browser.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Init { .. } | Self::NoBrowserBinary)
    }
}
