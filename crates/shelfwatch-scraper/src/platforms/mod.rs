//! Platform-specific payload mapping.
//!
//! Each platform module knows one storefront: its site profile (URLs,
//! selectors, API patterns) and how to read its search payload into
//! [`ParsedListing`]s. Ranking, de-duplication, and identity stamping are
//! shared and live in [`crate::extract`].

pub mod blinkit;
pub mod zepto;

use rust_decimal::Decimal;

/// One listing as it appears in a vendor payload, in payload order, before
/// ranks and task identity are stamped on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedListing {
    /// Listings without an id are dropped at assembly with a logged reason.
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub mrp: Option<Decimal>,
    pub rating: Option<f64>,
    pub rating_count: Option<i64>,
    pub in_stock: bool,
    pub is_sponsored: bool,
    pub pack_size: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
}
