//! Record assembly: ranked [`ProductRecord`]s out of parsed listings.

use std::collections::HashSet;

use chrono::Utc;
use tracing::warn;

use shelfwatch_core::{Platform, ProductRecord, SearchTask};

use crate::platforms::ParsedListing;

/// Turns one task's parsed listings (captures flattened in arrival order)
/// into its final record set: listings without a product id are dropped with
/// a logged reason, duplicates collapse onto their first occurrence, ranks
/// are assigned 1..N by surviving position, and task identity plus a shared
/// `extracted_at` timestamp are stamped on.
#[must_use]
pub fn assemble_records(
    platform: Platform,
    task: &SearchTask,
    listings: Vec<ParsedListing>,
) -> Vec<ProductRecord> {
    let extracted_at = Utc::now();
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for listing in listings {
        let Some(product_id) = listing.product_id else {
            warn!(
                keyword = %task.keyword,
                region = %task.region,
                name = listing.name.as_deref().unwrap_or("<unnamed>"),
                "listing has no product id, dropping"
            );
            continue;
        };
        if !seen.insert(product_id.clone()) {
            // Pagination refetch; the first occurrence keeps the better rank.
            continue;
        }

        let rank = u32::try_from(records.len()).unwrap_or(u32::MAX).saturating_add(1);
        records.push(ProductRecord {
            platform,
            keyword: task.keyword.clone(),
            region: task.region.clone(),
            rank,
            product_id,
            name: listing.name.unwrap_or_default(),
            brand: listing.brand.unwrap_or_default(),
            category: listing.category,
            price: listing.price,
            mrp: listing.mrp,
            rating: listing.rating,
            rating_count: listing.rating_count,
            in_stock: listing.in_stock,
            is_sponsored: listing.is_sponsored,
            pack_size: listing.pack_size,
            image_url: listing.image_url,
            product_url: listing.product_url,
            extracted_at,
        });
    }
    records
}
