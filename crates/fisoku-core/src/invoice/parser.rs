//! Heuristic receipt parser.

use std::fmt::Write;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::ParseError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::ParsedInvoice;
use crate::ocr::ExtractedText;

use super::rules::{
    KeywordSet, TaxNumberExtractor, extract_address, extract_company, extract_date,
    extract_line_items, extract_phone, extract_receipt_number, extract_time, extract_total,
    extract_vat,
};

/// Heading of the diagnostic block appended to `raw_text`.
pub const DETAILS_HEADER: &str = "--- extracted details ---";

/// Populates a [`ParsedInvoice`] from OCR text with independent per-field rules.
#[derive(Debug, Clone)]
pub struct FieldParser {
    company_keywords: KeywordSet,
    address_keywords: KeywordSet,
    tax_keywords: KeywordSet,
    vat_keywords: KeywordSet,
    company_scan_lines: usize,
    min_total_amount: Decimal,
    validate_tax_number: bool,
}

impl FieldParser {
    /// Compile the keyword sets in `config`.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ParseError> {
        Ok(Self {
            company_keywords: KeywordSet::new("company", &config.company_keywords)?,
            address_keywords: KeywordSet::new("address", &config.address_keywords)?,
            tax_keywords: KeywordSet::new("tax", &config.tax_keywords)?,
            vat_keywords: KeywordSet::new("vat", &config.vat_keywords)?,
            company_scan_lines: config.company_scan_lines,
            min_total_amount: config.min_total_amount,
            validate_tax_number: config.validate_tax_number,
        })
    }

    /// Set whether tax numbers must pass the VKN/TCKN checksum.
    pub fn with_tax_number_validation(mut self, validate: bool) -> Self {
        self.validate_tax_number = validate;
        self
    }

    /// Parse extracted OCR text.
    pub fn parse(&self, text: &ExtractedText) -> Result<ParsedInvoice, ParseError> {
        self.parse_lines(text.raw(), text.lines())
    }

    /// Parse arbitrary text; blank input yields an empty record.
    pub fn parse_str(&self, text: &str) -> Result<ParsedInvoice, ParseError> {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        self.parse_lines(text, &lines)
    }

    fn parse_lines(&self, raw: &str, lines: &[String]) -> Result<ParsedInvoice, ParseError> {
        let start = Instant::now();

        let mut invoice = ParsedInvoice {
            company_name: extract_company(lines, &self.company_keywords, self.company_scan_lines),
            date: extract_date(lines),
            total_amount: extract_total(lines, self.min_total_amount),
            tax_number: TaxNumberExtractor::new(&self.tax_keywords)
                .with_validation(self.validate_tax_number)
                .extract(lines),
            address: extract_address(lines, &self.address_keywords),
            phone: extract_phone(lines),
            receipt_number: extract_receipt_number(lines),
            vat_amount: extract_vat(lines, &self.vat_keywords),
            line_items: extract_line_items(lines),
            raw_text: String::new(),
        };

        let time = extract_time(lines);
        invoice.raw_text = render_raw_text(raw, &invoice, time.as_deref())?;

        let missing = invoice.missing_fields();
        if !missing.is_empty() {
            debug!("Fields not found: {}", missing.join(", "));
        }
        info!(
            "Parsed {} lines in {}ms ({} line items)",
            lines.len(),
            start.elapsed().as_millis(),
            invoice.line_items.len()
        );

        Ok(invoice)
    }
}

/// The OCR text followed by the diagnostic block.
fn render_raw_text(raw: &str, invoice: &ParsedInvoice, time: Option<&str>) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len() + 256);
    out.push_str(raw);
    if !raw.is_empty() && !raw.ends_with('\n') {
        out.push('\n');
    }

    let dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    writeln!(out)?;
    writeln!(out, "{}", DETAILS_HEADER)?;
    writeln!(out, "address: {}", dash(invoice.address.clone()))?;
    writeln!(out, "time: {}", dash(time.map(str::to_string)))?;
    writeln!(out, "receipt number: {}", dash(invoice.receipt_number.clone()))?;
    writeln!(out, "vat: {}", dash(invoice.vat_amount.map(|v| v.to_string())))?;
    if invoice.line_items.is_empty() {
        writeln!(out, "line items: -")?;
    } else {
        writeln!(out, "line items:")?;
        for item in &invoice.line_items {
            writeln!(out, "  {}: {}", item.label, item.price)?;
        }
    }
    write!(out, "phone: {}", dash(invoice.phone.clone()))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use crate::models::invoice::LineItem;

    fn parser() -> FieldParser {
        FieldParser::new(&ExtractionConfig::default()).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const RECEIPT: &str = "ÖRNEK MARKET A.Ş.\n\
                           MAH. CAD. NO:5\n\
                           19.03.2024 14:22:10\n\
                           VKN: 1234567890\n\
                           EKMEK 5,50\n\
                           TOPLAM TUTAR: 156,75";

    #[test]
    fn test_end_to_end_receipt() {
        let text = ExtractedText::new(RECEIPT).unwrap();
        let invoice = parser().parse(&text).unwrap();

        assert_eq!(invoice.company_name.as_deref(), Some("ÖRNEK MARKET A.Ş."));
        assert_eq!(
            invoice.date,
            NaiveDate::from_ymd_opt(2024, 3, 19).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(invoice.tax_number.as_deref(), Some("1234567890"));
        assert_eq!(invoice.total_amount, Some(dec("156.75")));
        assert_eq!(invoice.address.as_deref(), Some("MAH. CAD. NO:5"));
        assert!(invoice.line_items.contains(&LineItem::new("EKMEK", dec("5.50"))));
        assert!(invoice.missing_fields().is_empty());
    }

    #[test]
    fn test_raw_text_carries_diagnostic_block() {
        let invoice = parser().parse_str(RECEIPT).unwrap();

        assert!(invoice.raw_text.starts_with(RECEIPT));
        let block = invoice
            .raw_text
            .split(DETAILS_HEADER)
            .nth(1)
            .unwrap();
        assert_eq!(
            block,
            "\naddress: MAH. CAD. NO:5\n\
             time: 14:22:10\n\
             receipt number: -\n\
             vat: -\n\
             line items:\n  EKMEK: 5.50\n  TOPLAM TUTAR: 156.75\n\
             phone: -"
        );
    }

    #[test]
    fn test_subtotal_and_total() {
        let invoice = parser()
            .parse_str("ARA TOPLAM 45,00\nTOPLAM TUTAR: 156,75")
            .unwrap();
        assert_eq!(invoice.total_amount, Some(dec("156.75")));
    }

    #[test]
    fn test_company_upper_case_fallback() {
        let invoice = parser()
            .parse_str("hoş geldiniz\nKAHVE DÜNYASI\nSAAT 10:00")
            .unwrap();
        assert_eq!(invoice.company_name.as_deref(), Some("KAHVE DÜNYASI"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = parser();
        let text = ExtractedText::new(RECEIPT).unwrap();
        assert_eq!(parser.parse(&text).unwrap(), parser.parse(&text).unwrap());
    }

    #[test]
    fn test_blank_text_yields_empty_record() {
        let invoice = parser().parse_str("  \n").unwrap();
        assert_eq!(
            invoice.missing_fields(),
            vec!["company_name", "date", "total_amount", "tax_number"]
        );
        assert!(invoice.line_items.is_empty());
    }

    #[test]
    fn test_tax_number_validation_toggle() {
        let text = "VKN 1234567891\nREF 1234567890";
        assert_eq!(
            parser().parse_str(text).unwrap().tax_number.as_deref(),
            Some("1234567891")
        );
        assert_eq!(
            parser()
                .with_tax_number_validation(true)
                .parse_str(text)
                .unwrap()
                .tax_number
                .as_deref(),
            Some("1234567890")
        );
    }

    #[test]
    fn test_full_receipt_side_fields() {
        let invoice = parser()
            .parse_str(
                "ŞİFA ECZANESİ\n\
                 BAĞDAT CAD. NO:10\n\
                 KAT 1 DAİRE 2\n\
                 TEL: 02165551234\n\
                 FİŞ NO: 0042\n\
                 TOPKDV *1,80\n\
                 TOPLAM *19,80",
            )
            .unwrap();

        assert_eq!(invoice.company_name.as_deref(), Some("ŞİFA ECZANESİ"));
        assert_eq!(invoice.address.as_deref(), Some("BAĞDAT CAD. NO:10, KAT 1 DAİRE 2"));
        assert_eq!(invoice.phone.as_deref(), Some("02165551234"));
        assert_eq!(invoice.receipt_number.as_deref(), Some("0042"));
        assert_eq!(invoice.vat_amount, Some(dec("1.80")));
        assert_eq!(invoice.total_amount, Some(dec("19.80")));
        assert_eq!(invoice.tax_number, None);
    }

    #[test]
    fn test_telefon_number_is_not_a_tax_number() {
        let invoice = parser()
            .parse_str("KAHVE DÜNYASI\nTELEFON: 02165551234\nTOPLAM 45,00")
            .unwrap();
        assert_eq!(invoice.tax_number, None);
        assert_eq!(invoice.phone.as_deref(), Some("02165551234"));
    }

    #[test]
    fn test_date_fallback_uses_first_token_per_line() {
        let invoice = parser()
            .parse_str("REF 45.67.8901 19.03.2024\n01.04.2024")
            .unwrap();
        assert_eq!(
            invoice.date,
            NaiveDate::from_ymd_opt(2024, 4, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn test_empty_keyword_set_is_accepted() {
        let config = ExtractionConfig {
            company_keywords: Vec::new(),
            ..Default::default()
        };
        let invoice = FieldParser::new(&config)
            .unwrap()
            .parse_str("ÖRNEK MARKET A.Ş.")
            .unwrap();
        assert_eq!(invoice.company_name.as_deref(), Some("ÖRNEK MARKET A.Ş."));
    }
}
