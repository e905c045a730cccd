//! Fixed regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Decimal amounts: 5,50 / 156.75 / 1.234,56 / 1,234.56
    pub static ref AMOUNT: Regex = Regex::new(
        r"\d{1,3}(?:[.,]\d{3})+[.,]\d{2}|\d+[.,]\d{2}"
    ).unwrap();

    // Total labels (TOPLAM, TOP., TUTAR, TOTAL); TOPKDV is VAT, not a total
    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)\b(?:TOPLAM|TOP|TUTAR|TOTAL)\b"
    ).unwrap();

    // What may follow a labelled total on its line
    pub static ref TRAILING_CURRENCY: Regex = Regex::new(
        r"(?i)^\s*(?:TL|TRY|₺)?\s*$"
    ).unwrap();

    // DD.MM.YYYY with any of . / - as separator
    pub static ref DATE: Regex = Regex::new(
        r"\b(\d{2})[./\-](\d{2})[./\-](\d{4})\b"
    ).unwrap();

    // HH:MM:SS
    pub static ref TIME: Regex = Regex::new(
        r"\b(\d{2}):(\d{2}):(\d{2})\b"
    ).unwrap();

    // FİŞ NO / FATURA NO / BELGE NO, one capture group each
    pub static ref RECEIPT_NUMBER: Regex = Regex::new(
        r"(?i)F[İI][ŞS]\s*NO\s*[.:]*\s*([A-Z0-9/\-]+)|FATURA\s*NO\s*[.:]*\s*([A-Z0-9/\-]+)|BELGE\s*NO\s*[.:]*\s*([A-Z0-9/\-]+)"
    ).unwrap();

    // Telephone marker anywhere in the line (TEL, TELEFON, TELEFAX)
    pub static ref TEL_MARKER: Regex = Regex::new(
        r"(?i)TEL"
    ).unwrap();

    // TEL/TELEFON/TELEFAX followed by a 10-11 digit number, optionally with + and a country/trunk digit
    pub static ref PHONE: Regex = Regex::new(
        r"(?i)\bTEL\p{L}*[\s.:]*(\+?\d?\d{10,11})\b"
    ).unwrap();

    // Bare 10-11 digit sequence (VKN or TCKN)
    pub static ref TAX_DIGITS: Regex = Regex::new(
        r"\b\d{10,11}\b"
    ).unwrap();

    // Label followed by a price
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"(\p{L}[^\d]*?)[\s:*]*(\d{1,3}(?:[.,]\d{3})+[.,]\d{2}|\d+[.,]\d{2})"
    ).unwrap();

    pub static ref LETTER: Regex = Regex::new(
        r"\p{L}"
    ).unwrap();
}
