//! `Zepto` search API response parsing.
//!
//! The search endpoint returns a widget layout; product grids sit in
//! `layout[].data.resolver.data.items[]` with commercial fields (prices in
//! paise, stock, campaign markers) at the item level and catalog fields
//! nested under `item.product`.

use rust_decimal::Decimal;
use tracing::warn;

use crate::money::{paise_to_rupees, parse_rupees};
use crate::platforms::ParsedListing;

#[must_use]
pub fn parse_search_response(body: &str) -> Vec<ParsedListing> {
    let root: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "zepto payload is not JSON, skipping capture");
            return Vec::new();
        }
    };

    let widgets = root
        .get("layout")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut listings = Vec::new();
    for widget in widgets {
        if !is_product_grid(&widget) {
            continue;
        }

        let items = widget
            .get("data")
            .and_then(|data| data.get("resolver"))
            .and_then(|resolver| resolver.get("data"))
            .and_then(|data| data.get("items"))
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        for item in &items {
            listings.push(map_item(item));
        }
    }
    listings
}

fn is_product_grid(widget: &serde_json::Value) -> bool {
    ["widgetId", "widgetName"].iter().any(|key| {
        widget
            .get(*key)
            .and_then(serde_json::Value::as_str)
            .is_some_and(|value| value.starts_with("PRODUCT_GRID"))
    })
}

fn map_item(item: &serde_json::Value) -> ParsedListing {
    let null = serde_json::Value::Null;
    let product = item.get("product").unwrap_or(&null);
    let rating_summary = product.get("ratingSummary").unwrap_or(&null);

    let product_id = product
        .get("productId")
        .or_else(|| item.get("productId"))
        .and_then(value_as_string)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let product_url = product_id
        .as_ref()
        .map(|id| format!("https://www.zeptonow.com/product/{id}"));

    ParsedListing {
        name: product
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        brand: product
            .get("brand")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        category: product
            .get("primaryCategoryName")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        price: price_from(item, "discountedSellingPrice"),
        mrp: price_from(item, "mrp"),
        rating: rating_summary
            .get("averageRating")
            .and_then(value_as_f64)
            .filter(|value| *value > 0.0),
        rating_count: rating_summary
            .get("totalRatings")
            .and_then(serde_json::Value::as_i64),
        // A missing outOfStock flag means the item is not purchasable.
        in_stock: !item
            .get("outOfStock")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true),
        is_sponsored: item.get("campaignType").is_some() || item.get("campaignId").is_some(),
        pack_size: pack_size(product),
        image_url: product
            .get("imageUrl")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        product_id,
        product_url,
    }
}

/// Prices arrive as integer paise; a string is accepted as a rupee display
/// value for drift tolerance. Anything else present but unreadable yields
/// null with a warning.
fn price_from(item: &serde_json::Value, key: &str) -> Option<Decimal> {
    let value = item.get(key)?;
    if value.is_null() {
        return None;
    }
    let parsed = value
        .as_i64()
        .map(paise_to_rupees)
        .or_else(|| value.as_str().and_then(parse_rupees));
    if parsed.is_none() {
        warn!(key, raw = %value, "unparseable zepto price, leaving null");
    }
    parsed
}

fn pack_size(product: &serde_json::Value) -> Option<String> {
    product
        .get("packsize")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| {
            product
                .get("weightInGms")
                .and_then(serde_json::Value::as_i64)
                .filter(|grams| *grams > 0)
                .map(|grams| format!("{grams} g"))
        })
}

fn value_as_string(value: &serde_json::Value) -> Option<String> {
    value.as_str().map(str::to_string).or_else(|| {
        if value.is_number() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|raw| raw.parse::<f64>().ok()))
}
