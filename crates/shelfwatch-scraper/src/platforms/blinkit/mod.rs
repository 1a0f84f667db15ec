//! `Blinkit` storefront profile.

mod parse;

pub use parse::parse_search_response;

use shelfwatch_core::Platform;

use crate::site::SiteProfile;

const BASE_URL: &str = "https://blinkit.com";

const API_URL_PATTERNS: &[&str] = &[
    "blinkit.com/v1/layout/search",
    "blinkit.com/v6/search/products",
];

const SEARCH_TRIGGER_SELECTORS: &[&str] = &[
    "a[data-test-id='search-bar']",
    "a[href*='/s/']",
    "div[class*='SearchBar']",
];

const SEARCH_INPUT_SELECTORS: &[&str] = &[
    "input[placeholder*='Search']",
    "input[type='search']",
    "input[data-test-id='search-input']",
];

const REVEALED_INPUT_SELECTORS: &[&str] = &[
    "input[placeholder*='Search']",
    "input[type='search']",
];

const LOCATION_BUTTON_SELECTORS: &[&str] = &[
    "div[class*='LocationBar']",
    "button[class*='location']",
];

const LOCATION_INPUT_SELECTORS: &[&str] = &[
    "input[name='select-locality']",
    "input[placeholder*='search delivery location' i]",
];

#[must_use]
pub fn profile() -> SiteProfile {
    SiteProfile {
        platform: Platform::Blinkit,
        base_url: BASE_URL,
        search_url_template: "https://blinkit.com/s/?q={query}",
        search_trigger_selectors: SEARCH_TRIGGER_SELECTORS,
        search_input_selectors: SEARCH_INPUT_SELECTORS,
        revealed_input_selectors: REVEALED_INPUT_SELECTORS,
        location_button_selectors: LOCATION_BUTTON_SELECTORS,
        location_input_selectors: LOCATION_INPUT_SELECTORS,
        api_url_patterns: API_URL_PATTERNS,
        parse: parse_search_response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
