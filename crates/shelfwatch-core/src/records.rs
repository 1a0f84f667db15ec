use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Platform;

/// One normalized search listing, the unit everything downstream consumes.
///
/// `rank` is the 1-indexed on-page display position and is unique and
/// contiguous within one (platform, keyword, region) result set. It is
/// assigned once at extraction time and never recomputed as a sort key.
///
/// Money fields are rupees. `price` and `mrp` are `None` when the vendor
/// payload omits them or the value fails to parse — extraction warns but
/// never fabricates a number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub platform: Platform,
    pub keyword: String,
    pub region: String,
    pub rank: u32,
    pub product_id: String,
    pub name: String,
    /// Empty when the vendor omits brand; the aggregator buckets those as
    /// unknown rather than dropping them.
    pub brand: String,
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
    pub extracted_at: DateTime<Utc>,
}
