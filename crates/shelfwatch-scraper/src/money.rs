//! Money normalization helpers.
//!
//! Vendor payloads are inconsistent about money: some endpoints send amounts
//! as integer paise, others as display strings like `"₹1,234.50"`. Both
//! normalize to rupees as [`Decimal`] under a fixed en-IN locale assumption
//! (comma as thousands separator, dot as decimal point).

use rust_decimal::Decimal;

/// Parses a display price such as `"₹1,234.50"`, `"Rs. 99"`, or `"92"` into
/// rupees. Returns `None` when no parseable amount is present; callers decide
/// whether that warrants a warning.
#[must_use]
pub fn parse_rupees(raw: &str) -> Option<Decimal> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let numeric: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    numeric.parse::<Decimal>().ok()
}

/// Converts integer paise (the smallest rupee unit) to rupees.
#[must_use]
pub fn paise_to_rupees(paise: i64) -> Decimal {
    Decimal::new(paise, 2)
}
