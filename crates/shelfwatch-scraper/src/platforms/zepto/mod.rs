//! `Zepto` storefront profile.

mod parse;

pub use parse::parse_search_response;

use shelfwatch_core::Platform;

use crate::site::SiteProfile;

const BASE_URL: &str = "https://www.zeptonow.com";

/// Backend endpoints that carry search results, by API version.
const API_URL_PATTERNS: &[&str] = &[
    "api.zepto.com/api/v3/search",
    "api.zepto.com/api/v1/search",
];

/// Anchors that open the search surface on the homepage.
const SEARCH_TRIGGER_SELECTORS: &[&str] = &[
    "a[aria-label='Search for products']",
    "a[data-testid='search-bar-icon']",
    "a.flex.items-center",
    "div.inline-block a",
];

/// Inputs that take the keyword directly.
const SEARCH_INPUT_SELECTORS: &[&str] = &[
    "input[placeholder*='Search']",
    "input[type='search']",
    ".MuiInputBase-input",
    "input.search-input",
    "input[aria-label*='search' i]",
    "[data-testid='search-input']",
];

/// Inputs revealed after clicking a search anchor.
const REVEALED_INPUT_SELECTORS: &[&str] = &[
    "input[placeholder*='Search']",
    "input[type='search']",
    "input.search-input",
];

const LOCATION_BUTTON_SELECTORS: &[&str] = &[
    "button[aria-label='Select Location']",
    "[data-testid='location-box']",
];

const LOCATION_INPUT_SELECTORS: &[&str] = &[
    "input[placeholder*='Search a new address' i]",
    "input[placeholder*='Search']",
];

#[must_use]
pub fn profile() -> SiteProfile {
    SiteProfile {
        platform: Platform::Zepto,
        base_url: BASE_URL,
        search_url_template: "https://www.zeptonow.com/search?q={query}",
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

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::parse_search_response;

    fn grid_response(items: serde_json::Value) -> String {
        json!({
            "layout": [
                {
                    "widgetId": "PRODUCT_GRID",
                    "data": { "resolver": { "data": { "items": items } } }
                }
            ]
        })
        .to_string()
    }

    #[test]
    fn parses_product_grid_items() {
        let body = grid_response(json!([
            {
                "product": {
                    "productId": "prod-1",
                    "name": "Amul Taaza Toned Milk",
                    "brand": "Amul",
                    "primaryCategoryName": "Dairy",
                    "imageUrl": "https://cdn.zeptonow.com/p/prod-1.png",
                    "packsize": "500 ml",
                    "ratingSummary": { "averageRating": 4.4, "totalRatings": 1250 }
                },
                "mrp": 3600,
                "discountedSellingPrice": 3400,
                "outOfStock": false
            }
        ]));

        let listings = parse_search_response(&body);
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];

        assert_eq!(listing.product_id.as_deref(), Some("prod-1"));
        assert_eq!(listing.name.as_deref(), Some("Amul Taaza Toned Milk"));
        assert_eq!(listing.brand.as_deref(), Some("Amul"));
        assert_eq!(listing.category.as_deref(), Some("Dairy"));
        assert_eq!(listing.price, Some(Decimal::new(3400, 2)));
        assert_eq!(listing.mrp, Some(Decimal::new(3600, 2)));
        assert_eq!(listing.rating, Some(4.4));
        assert_eq!(listing.rating_count, Some(1250));
        assert!(listing.in_stock);
        assert!(!listing.is_sponsored);
        assert_eq!(listing.pack_size.as_deref(), Some("500 ml"));
        assert_eq!(
            listing.product_url.as_deref(),
            Some("https://www.zeptonow.com/product/prod-1")
        );
    }

    #[test]
    fn skips_widgets_without_product_grid_marker() {
        let body = json!({
            "layout": [
                {
                    "widgetId": "BANNER_CAROUSEL",
                    "data": { "resolver": { "data": { "items": [{"product": {"productId": "x"}}] } } }
                },
                {
                    "widgetName": "PRODUCT_GRID_V2",
                    "data": { "resolver": { "data": { "items": [{"product": {"productId": "prod-9"}}] } } }
                }
            ]
        })
        .to_string();

        let listings = parse_search_response(&body);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].product_id.as_deref(), Some("prod-9"));
    }

    #[test]
    fn missing_product_id_yields_listing_without_id() {
        let body = grid_response(json!([
            { "product": { "name": "Mystery Item" }, "mrp": 1000 }
        ]));

        let listings = parse_search_response(&body);
        assert_eq!(listings.len(), 1);
        assert!(listings[0].product_id.is_none());
        assert_eq!(listings[0].name.as_deref(), Some("Mystery Item"));
    }

    #[test]
    fn missing_out_of_stock_flag_means_unavailable() {
        let body = grid_response(json!([
            { "product": { "productId": "prod-2" } }
        ]));

        let listings = parse_search_response(&body);
        assert!(!listings[0].in_stock);
    }

    #[test]
    fn campaign_marker_sets_sponsored() {
        let body = grid_response(json!([
            { "product": { "productId": "prod-3" }, "campaignId": "cmp-77", "outOfStock": false },
            { "product": { "productId": "prod-4" }, "outOfStock": false }
        ]));

        let listings = parse_search_response(&body);
        assert!(listings[0].is_sponsored);
        assert!(!listings[1].is_sponsored);
    }

    #[test]
    fn string_price_is_tolerated_as_rupees() {
        let body = grid_response(json!([
            { "product": { "productId": "prod-5" }, "discountedSellingPrice": "₹129.99" }
        ]));

        let listings = parse_search_response(&body);
        assert_eq!(listings[0].price, Some(Decimal::new(12999, 2)));
    }

    #[test]
    fn unparseable_price_yields_null() {
        let body = grid_response(json!([
            { "product": { "productId": "prod-6" }, "discountedSellingPrice": "call us" }
        ]));

        let listings = parse_search_response(&body);
        assert_eq!(listings[0].price, None);
    }

    #[test]
    fn numeric_product_id_is_stringified() {
        let body = grid_response(json!([
            { "product": { "productId": 48213 } }
        ]));

        let listings = parse_search_response(&body);
        assert_eq!(listings[0].product_id.as_deref(), Some("48213"));
    }

    #[test]
    fn weight_fallback_builds_pack_size() {
        let body = grid_response(json!([
            { "product": { "productId": "prod-7", "weightInGms": 250 } }
        ]));

        let listings = parse_search_response(&body);
        assert_eq!(listings[0].pack_size.as_deref(), Some("250 g"));
    }

    #[test]
    fn non_json_body_yields_empty() {
        assert!(parse_search_response("<html>blocked</html>").is_empty());
    }

    #[test]
    fn empty_layout_yields_empty() {
        assert!(parse_search_response(r#"{"layout": []}"#).is_empty());
    }
}
