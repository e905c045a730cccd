//! Company / shop name.

use super::KeywordSet;

/// Company name from the first `scan_lines` lines.
///
/// A line with a company keyword wins; otherwise the first all-caps line
/// longer than three characters.
pub fn extract_company(lines: &[String], keywords: &KeywordSet, scan_lines: usize) -> Option<String> {
    let head = &lines[..scan_lines.min(lines.len())];

    head.iter()
        .find(|line| keywords.is_match(line))
        .or_else(|| head.iter().find(|line| is_upper_case_name(line)))
        .cloned()
}

fn is_upper_case_name(line: &str) -> bool {
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    line.chars().count() > 3 && letters.peek().is_some() && letters.all(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keywords() -> KeywordSet {
        KeywordSet::new("company", &["A.Ş.".to_string(), "MARKET".to_string(), "ECZANESİ".to_string()])
            .unwrap()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_line_wins() {
        let text = lines(&["HOŞGELDİNİZ", "Şifa Market", "19.03.2024"]);
        assert_eq!(extract_company(&text, &keywords(), 5), Some("Şifa Market".to_string()));
    }

    #[test]
    fn test_upper_case_fallback() {
        let text = lines(&["fiş", "ABC", "KAHVE DÜNYASI", "Kadıköy"]);
        assert_eq!(extract_company(&text, &keywords(), 5), Some("KAHVE DÜNYASI".to_string()));
    }

    #[test]
    fn test_only_leading_lines_scanned() {
        let text = lines(&["tarih", "saat", "ÖRNEK MARKET"]);
        assert_eq!(extract_company(&text, &keywords(), 2), None);
    }

    #[test]
    fn test_digits_only_is_not_a_name() {
        let text = lines(&["1234567", "12:30"]);
        assert_eq!(extract_company(&text, &keywords(), 5), None);
    }
}
