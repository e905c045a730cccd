//! VAT (KDV) amount.

use rust_decimal::Decimal;

use super::KeywordSet;
use super::amounts::find_amounts;

/// First amount on the first line that has a VAT keyword and an amount.
pub fn extract_vat(lines: &[String], keywords: &KeywordSet) -> Option<Decimal> {
    lines
        .iter()
        .filter(|line| keywords.is_match(line))
        .find_map(|line| find_amounts(line).first().map(|m| m.value))
}
