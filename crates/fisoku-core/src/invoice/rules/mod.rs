//! Rule-based field extractors for Turkish receipts.
//!
//! Every rule is a pure function over the receipt's non-empty, trimmed lines.

pub mod address;
pub mod amounts;
pub mod company;
pub mod contact;
pub mod dates;
pub mod items;
pub mod patterns;
pub mod tax_number;
pub mod vat;

pub use address::extract_address;
pub use amounts::{extract_total, find_amounts, max_amount, parse_amount, reverse_scan_total};
pub use company::extract_company;
pub use contact::{extract_phone, extract_receipt_number};
pub use dates::{extract_date, extract_time, parse_date};
pub use items::extract_line_items;
pub use tax_number::{TaxNumberExtractor, validate_tax_number, validate_tckn, validate_vkn};
pub use vat::extract_vat;

use regex::{Match, Regex, RegexBuilder};

use crate::error::ParseError;

/// A configurable keyword list compiled into one case-insensitive regex.
///
/// Keywords match literally. Ends made of word characters must sit on a
/// word boundary, so `SAN` does not fire inside `HASAN`.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    pattern: Option<Regex>,
}

impl KeywordSet {
    pub fn new(field: &'static str, keywords: &[String]) -> Result<Self, ParseError> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(keyword_pattern)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|source| ParseError::Pattern { field, source })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(line))
    }

    /// Leftmost keyword occurrence.
    pub fn find<'h>(&self, line: &'h str) -> Option<Match<'h>> {
        self.pattern.as_ref().and_then(|p| p.find(line))
    }
}

fn keyword_pattern(keyword: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');

    let mut pattern = String::new();
    if is_word(keyword.chars().next()) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(keyword));
    if is_word(keyword.chars().last()) {
        pattern.push_str(r"\b");
    }
    pattern
}
