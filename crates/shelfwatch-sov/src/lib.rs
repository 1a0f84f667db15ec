//! Share-of-voice analysis for shelfwatch.
//!
//! Folds normalized product records into per-brand visibility scores, one
//! row per (keyword, region, brand). Appearances are weighted by rank with
//! a pluggable decay curve so that a brand sitting at the top of the results
//! counts for more than one buried on page three.

pub mod aggregate;
pub mod weighting;

pub use aggregate::{aggregate, aggregate_with, VisibilityScore, UNKNOWN_BRAND};
pub use weighting::RankWeighting;
