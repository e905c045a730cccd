//! Phone and receipt number.

use super::patterns::{PHONE, RECEIPT_NUMBER};

/// Number after the first `TEL`/`TELEFON` marker that carries one.
pub fn extract_phone(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| PHONE.captures(line))
        .map(|caps| caps[1].to_string())
}

/// Number after the first `FİŞ NO`, `FATURA NO` or `BELGE NO` label.
pub fn extract_receipt_number(lines: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        let caps = RECEIPT_NUMBER.captures(line)?;
        caps.iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    })
}
