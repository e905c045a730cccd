//! Decimal amounts and the three-tier total rule.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT, TOTAL_LABEL, TRAILING_CURRENCY};

/// An amount found on a line, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountMatch {
    pub value: Decimal,
    pub start: usize,
    pub end: usize,
}

/// Every standalone decimal amount on `line`, left to right.
///
/// A match touching another digit or a separator followed by a digit is part
/// of something else (a date, a longer number) and is skipped.
pub fn find_amounts(line: &str) -> Vec<AmountMatch> {
    AMOUNT
        .find_iter(line)
        .filter(|m| is_isolated(line, m.start(), m.end()))
        .filter_map(|m| {
            parse_amount(m.as_str()).map(|value| AmountMatch {
                value,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

/// Last standalone amount on `line`.
pub fn last_amount(line: &str) -> Option<Decimal> {
    find_amounts(line).last().map(|m| m.value)
}

pub(crate) fn is_isolated(line: &str, start: usize, end: usize) -> bool {
    let is_sep = |c: char| c == '.' || c == ',';

    let mut before = line[..start].chars().rev();
    let touches_before = match (before.next(), before.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some(c), Some(d)) if is_sep(c) && d.is_ascii_digit() => true,
        _ => false,
    };

    let mut after = line[end..].chars();
    let touches_after = match (after.next(), after.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some(c), Some(d)) if is_sep(c) && d.is_ascii_digit() => true,
        _ => false,
    };

    !touches_before && !touches_after
}

/// Parse an amount written with `,` or `.` separators.
///
/// The last separator is the decimal point; earlier ones group thousands.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = match cleaned.rfind([',', '.']) {
        Some(pos) => {
            let integer: String = cleaned[..pos].chars().filter(char::is_ascii_digit).collect();
            format!("{}.{}", integer, &cleaned[pos + 1..])
        }
        None => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Total amount: labelled line or plausible last amount scanning upwards,
/// falling back to the largest amount anywhere.
pub fn extract_total(lines: &[String], min_total: Decimal) -> Option<Decimal> {
    reverse_scan_total(lines, min_total).or_else(|| max_amount(lines))
}

/// Scan from the bottom. A labelled total wins immediately; otherwise the
/// first line whose last amount exceeds `min_total` is taken.
pub fn reverse_scan_total(lines: &[String], min_total: Decimal) -> Option<Decimal> {
    for line in lines.iter().rev() {
        if let Some(total) = labelled_total(line) {
            return Some(total);
        }

        if let Some(amount) = last_amount(line) {
            if amount > min_total {
                return Some(amount);
            }
        }
    }
    None
}

/// The trailing amount of a line carrying a total label.
fn labelled_total(line: &str) -> Option<Decimal> {
    let label = TOTAL_LABEL.find(line)?;
    let amount = find_amounts(line).pop()?;

    if amount.start < label.end() || !TRAILING_CURRENCY.is_match(&line[amount.end..]) {
        return None;
    }
    Some(amount.value)
}

/// Largest amount on any line.
pub fn max_amount(lines: &[String]) -> Option<Decimal> {
    lines
        .iter()
        .flat_map(|line| find_amounts(line))
        .map(|m| m.value)
        .max()
}
