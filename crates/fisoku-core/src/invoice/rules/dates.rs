//! Receipt date and time extraction.

use chrono::{NaiveDate, NaiveDateTime};

use super::patterns::{DATE, TIME};

/// Formats tried in order by [`parse_date`].
const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a date string against the supported formats, first success wins.
///
/// The result is at midnight.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Date of the receipt.
///
/// The first line with a date-shaped token decides. If that token is not a
/// real date (`32.13.2024`, mixed separators), the first token of each line
/// is tried in order instead.
pub fn extract_date(lines: &[String]) -> Option<NaiveDateTime> {
    let primary = lines
        .iter()
        .find_map(|line| DATE.find(line))
        .and_then(|m| parse_date(m.as_str()));

    primary.or_else(|| {
        lines
            .iter()
            .filter_map(|line| DATE.find(line))
            .find_map(|m| parse_date(m.as_str()))
    })
}

/// First `HH:MM:SS` token, as printed.
pub fn extract_time(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| TIME.find(line))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn march_19() -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, 19).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("19.03.2024"), march_19());
        assert_eq!(parse_date("19/03/2024"), march_19());
        assert_eq!(parse_date("2024-03-19"), march_19());
        assert_eq!(parse_date("19-03-2024"), march_19());
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert_eq!(parse_date("2024.03.19"), None);
        assert_eq!(parse_date("19 Mart 2024"), None);
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_extract_date_first_line_wins() {
        let text = lines(&["TARIH: 19.03.2024", "SKT 01.01.2026"]);
        assert_eq!(extract_date(&text), march_19());
    }

    #[test]
    fn test_extract_date_falls_back_past_invalid_token() {
        let text = lines(&["REF 45.67.8901 19.03.2024", "01.04.2024"]);
        assert_eq!(
            extract_date(&text),
            NaiveDate::from_ymd_opt(2024, 4, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn test_extract_date_fallback_ignores_later_tokens() {
        let text = lines(&["32.13.2024 19.03.2024", "TOPLAM 5,00"]);
        assert_eq!(extract_date(&text), None);
    }

    #[test]
    fn test_extract_time() {
        let text = lines(&["19.03.2024 14:22:10"]);
        assert_eq!(extract_time(&text), Some("14:22:10".to_string()));
        assert_eq!(extract_time(&lines(&["14:22"])), None);
    }
}
