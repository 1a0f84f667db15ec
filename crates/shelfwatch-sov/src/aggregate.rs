//! Folds product records into per-brand visibility scores.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use shelfwatch_core::ProductRecord;

use crate::weighting::RankWeighting;

/// Bucket for records whose brand field came back blank.
///
/// Kept explicit rather than dropped so the share percentages within a
/// (keyword, region) group always account for every ranked listing.
pub const UNKNOWN_BRAND: &str = "(unknown)";

/// One brand's visibility within a single (keyword, region) search.
///
/// Derived data: recomputed from the record set on every aggregation run,
/// never treated as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityScore {
    pub keyword: String,
    pub region: String,
    pub brand: String,
    /// Sum of rank weights over the brand's appearances. Not normalized.
    pub weighted_score: Decimal,
    /// Unweighted appearance count.
    pub raw_count: u32,
    /// `raw_count` as a percentage of the group's listings, 2 dp.
    pub count_share_pct: Decimal,
    /// `weighted_score` as a percentage of the group's weighted total, 2 dp.
    pub weighted_share_pct: Decimal,
    /// Mean rank of the brand's appearances, 2 dp.
    pub avg_rank: Decimal,
    /// How many of the appearances carried a sponsorship marker.
    pub sponsored_count: u32,
}

#[derive(Default)]
struct BrandAccum {
    weighted: Decimal,
    count: u32,
    rank_sum: Decimal,
    sponsored: u32,
}

/// Aggregate records into visibility scores using a named weighting curve.
#[must_use]
pub fn aggregate(records: &[ProductRecord], weighting: RankWeighting) -> Vec<VisibilityScore> {
    aggregate_with(records, |rank| weighting.weight(rank))
}

/// Aggregate records into visibility scores with an arbitrary weight function.
///
/// 1. Group records by (keyword, region), then by brand. Blank brands land
///    in the [`UNKNOWN_BRAND`] bucket.
/// 2. Sum `weight(rank)` per brand; count appearances and sponsored slots.
/// 3. Derive share percentages and mean rank per brand from the group totals.
///
/// Records with rank 0 are malformed, logged, and skipped. Output order is
/// deterministic: (keyword, region) ascending, then `weighted_score`
/// descending, then brand ascending. Equal scores stay exactly equal; ties
/// are broken only in ordering, never in the scores themselves.
#[must_use]
pub fn aggregate_with<F>(records: &[ProductRecord], weight: F) -> Vec<VisibilityScore>
where
    F: Fn(u32) -> Decimal,
{
    let mut groups: BTreeMap<(String, String), BTreeMap<String, BrandAccum>> = BTreeMap::new();

    for record in records {
        if record.rank == 0 {
            tracing::warn!(
                keyword = %record.keyword,
                region = %record.region,
                product_id = %record.product_id,
                "record carries rank 0, skipping"
            );
            continue;
        }
        let accum = groups
            .entry((record.keyword.clone(), record.region.clone()))
            .or_default()
            .entry(normalize_brand(&record.brand))
            .or_default();
        accum.weighted += weight(record.rank);
        accum.count += 1;
        accum.rank_sum += Decimal::from(record.rank);
        if record.is_sponsored {
            accum.sponsored += 1;
        }
    }

    let mut scores = Vec::new();
    for ((keyword, region), brands) in groups {
        let count_total = Decimal::from(brands.values().map(|a| a.count).sum::<u32>());
        let weighted_total: Decimal = brands.values().map(|a| a.weighted).sum();

        let mut group_scores: Vec<VisibilityScore> = brands
            .into_iter()
            .map(|(brand, accum)| VisibilityScore {
                keyword: keyword.clone(),
                region: region.clone(),
                brand,
                weighted_score: accum.weighted,
                raw_count: accum.count,
                count_share_pct: share_pct(Decimal::from(accum.count), count_total),
                weighted_share_pct: share_pct(accum.weighted, weighted_total),
                avg_rank: (accum.rank_sum / Decimal::from(accum.count)).round_dp(2),
                sponsored_count: accum.sponsored,
            })
            .collect();

        group_scores.sort_by(|a, b| {
            b.weighted_score
                .cmp(&a.weighted_score)
                .then_with(|| a.brand.cmp(&b.brand))
        });
        scores.extend(group_scores);
    }
    scores
}

fn normalize_brand(brand: &str) -> String {
    let trimmed = brand.trim();
    if trimmed.is_empty() {
        UNKNOWN_BRAND.to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn share_pct(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED).round_dp(2)
}
