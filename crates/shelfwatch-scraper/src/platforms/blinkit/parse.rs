//! `Blinkit` search API response parsing.
//!
//! The layout engine returns snippets under `response.snippets[]`; product
//! cards carry a `widget_type` starting with `product_card` and wrap most
//! scalar fields in `{"text": …}` / `{"value": …}` atoms. Prices are display
//! strings (`"₹92"`), not minor units.

use rust_decimal::Decimal;
use tracing::warn;

use crate::money::parse_rupees;
use crate::platforms::ParsedListing;

#[must_use]
pub fn parse_search_response(body: &str) -> Vec<ParsedListing> {
    let root: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "blinkit payload is not JSON, skipping capture");
            return Vec::new();
        }
    };

    root.get("response")
        .and_then(|response| response.get("snippets"))
        .and_then(serde_json::Value::as_array)
        .into_iter()
        .flat_map(|snippets| snippets.iter())
        .filter(|snippet| is_product_card(snippet))
        .map(map_snippet)
        .collect()
}

fn is_product_card(snippet: &serde_json::Value) -> bool {
    snippet
        .get("widget_type")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|value| value.starts_with("product_card"))
}

fn map_snippet(snippet: &serde_json::Value) -> ParsedListing {
    let null = serde_json::Value::Null;
    let data = snippet.get("data").unwrap_or(&null);
    let rating = data.get("rating").unwrap_or(&null);

    let product_id = data
        .get("identity")
        .and_then(|identity| identity.get("id"))
        .and_then(value_as_string)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let product_url = product_id
        .as_ref()
        .map(|id| format!("https://blinkit.com/prn/p/prid/{id}"));

    ParsedListing {
        name: text_field(data, "name"),
        brand: text_field(data, "brand_name"),
        category: text_field(data, "category"),
        price: price_from(data, "normal_price"),
        mrp: price_from(data, "mrp"),
        rating: rating.get("value").and_then(value_as_f64),
        rating_count: rating.get("count").and_then(serde_json::Value::as_i64),
        // Inventory is a unit count; absent means nothing left to sell.
        in_stock: data
            .get("inventory")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0)
            > 0,
        is_sponsored: data
            .get("is_sponsored")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
        pack_size: text_field(data, "variant"),
        image_url: data
            .get("image")
            .and_then(|image| image.get("url"))
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        product_id,
        product_url,
    }
}

fn text_field(data: &serde_json::Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(|atom| atom.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn price_from(data: &serde_json::Value, key: &str) -> Option<Decimal> {
    let raw = text_field(data, key)?;
    let parsed = parse_rupees(&raw);
    if parsed.is_none() {
        warn!(key, raw, "unparseable blinkit price, leaving null");
    }
    parsed
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
