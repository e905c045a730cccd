//! Turkish tax registry numbers (VKN, 10 digits; TCKN, 11 digits).

use super::KeywordSet;
use super::patterns::{TAX_DIGITS, TEL_MARKER};

/// Tax number extractor.
pub struct TaxNumberExtractor<'a> {
    keywords: &'a KeywordSet,
    validate: bool,
}

impl<'a> TaxNumberExtractor<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self {
            keywords,
            validate: false,
        }
    }

    /// Set whether candidates must pass the VKN/TCKN checksum.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// First acceptable tax number.
    ///
    /// Lines carrying a tax keyword are tried first, preferring the number
    /// after the keyword. Lines with a `TEL` marker never contribute.
    pub fn extract(&self, lines: &[String]) -> Option<String> {
        let candidate_lines = lines.iter().filter(|line| !TEL_MARKER.is_match(line));

        for line in candidate_lines.clone() {
            let Some(keyword) = self.keywords.find(line) else {
                continue;
            };

            let after_keyword = TAX_DIGITS.find_at(line, keyword.end()).into_iter();
            let anywhere = TAX_DIGITS.find_iter(line);
            if let Some(number) = after_keyword
                .chain(anywhere)
                .map(|m| m.as_str())
                .find(|n| self.accepts(n))
            {
                return Some(number.to_string());
            }
        }

        candidate_lines
            .flat_map(|line| TAX_DIGITS.find_iter(line))
            .map(|m| m.as_str())
            .find(|n| self.accepts(n))
            .map(str::to_string)
    }

    fn accepts(&self, number: &str) -> bool {
        !self.validate || validate_tax_number(number)
    }
}

/// Check a 10-digit VKN or an 11-digit TCKN.
pub fn validate_tax_number(number: &str) -> bool {
    match number.len() {
        10 => validate_vkn(number),
        11 => validate_tckn(number),
        _ => false,
    }
}

/// Validate a VKN (corporate tax number) checksum.
pub fn validate_vkn(vkn: &str) -> bool {
    let digits = match digits_of(vkn, 10) {
        Some(d) => d,
        None => return false,
    };

    let mut sum = 0u32;
    for (i, &d) in digits.iter().take(9).enumerate() {
        let position = i as u32 + 1;
        let tmp = (d + 10 - position) % 10;
        sum += if tmp == 9 {
            9
        } else {
            (tmp * 2u32.pow(10 - position)) % 9
        };
    }

    (10 - sum % 10) % 10 == digits[9]
}

/// Validate a TCKN (citizen identity number) checksum.
pub fn validate_tckn(tckn: &str) -> bool {
    let digits = match digits_of(tckn, 11) {
        Some(d) => d,
        None => return false,
    };
    if digits[0] == 0 {
        return false;
    }

    let odd: i64 = digits.iter().step_by(2).take(5).map(|&d| d as i64).sum();
    let even: i64 = digits.iter().skip(1).step_by(2).take(4).map(|&d| d as i64).sum();
    let tenth = (odd * 7 - even).rem_euclid(10) as u32;
    let eleventh = digits.iter().take(10).sum::<u32>() % 10;

    digits[9] == tenth && digits[10] == eleventh
}

fn digits_of(s: &str, len: usize) -> Option<Vec<u32>> {
    let digits: Vec<u32> = s.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?;
    (digits.len() == len).then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keywords() -> KeywordSet {
        KeywordSet::new("tax", &["VKN".to_string(), "VERGİ".to_string(), "V.D.".to_string()])
            .unwrap()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_vkn() {
        assert!(validate_vkn("1234567890"));
        assert!(validate_vkn("0000000001"));
        assert!(!validate_vkn("1234567891"));
        assert!(!validate_vkn("123456789"));
        assert!(!validate_vkn("12345678a0"));
    }

    #[test]
    fn test_validate_tckn() {
        assert!(validate_tckn("10000000146"));
        assert!(!validate_tckn("10000000147"));
        assert!(!validate_tckn("01234567890"));
    }

    #[test]
    fn test_keyword_line() {
        let keywords = keywords();
        let text = lines(&["ÖRNEK MARKET", "KADIKÖY V.D. 1234567890"]);
        assert_eq!(
            TaxNumberExtractor::new(&keywords).extract(&text),
            Some("1234567890".to_string())
        );
    }

    #[test]
    fn test_number_after_keyword_preferred() {
        let keywords = keywords();
        let text = lines(&["9876543210 VKN: 1234567890"]);
        assert_eq!(
            TaxNumberExtractor::new(&keywords).extract(&text),
            Some("1234567890".to_string())
        );
    }

    #[test]
    fn test_tel_lines_skipped() {
        let keywords = keywords();
        let text = lines(&["VERGİ TEL 02125551234", "5554443332"]);
        assert_eq!(
            TaxNumberExtractor::new(&keywords).extract(&text),
            Some("5554443332".to_string())
        );
    }

    #[test]
    fn test_telefon_and_telefax_lines_skipped() {
        let keywords = keywords();
        let text = lines(&["KAHVE DÜNYASI", "TELEFON: 02165551234", "Telefax 02165551235"]);
        assert_eq!(TaxNumberExtractor::new(&keywords).extract(&text), None);
    }

    #[test]
    fn test_validation_skips_bad_checksums() {
        let keywords = keywords();
        let text = lines(&["VKN 1234567891", "REF 1234567890"]);
        assert_eq!(
            TaxNumberExtractor::new(&keywords).extract(&text),
            Some("1234567891".to_string())
        );
        assert_eq!(
            TaxNumberExtractor::new(&keywords)
                .with_validation(true)
                .extract(&text),
            Some("1234567890".to_string())
        );
    }
}
