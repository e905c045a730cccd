//! Receipt data models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields parsed out of a receipt's OCR text.
///
/// Every field is independently optional; `None` means "not found".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    /// Issuing company or shop name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Receipt date (time of day is midnight; the printed time is kept in `raw_text`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,

    /// Grand total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,

    /// Tax registry number (10 or 11 digits).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,

    /// Shop address, possibly merged from two lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Telephone number as printed after the `TEL` marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Receipt / document number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,

    /// VAT amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_amount: Option<Decimal>,

    /// Best-effort item rows, in text order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,

    /// OCR text followed by the diagnostic block.
    pub raw_text: String,
}

/// A label and price pair found on an item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub price: Decimal,
}

impl LineItem {
    pub fn new(label: impl Into<String>, price: Decimal) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

impl ParsedInvoice {
    /// Names of the persisted fields that were not found.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.company_name.is_none() {
            missing.push("company_name");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.total_amount.is_none() {
            missing.push("total_amount");
        }
        if self.tax_number.is_none() {
            missing.push("tax_number");
        }

        missing
    }
}

/// The persisted subset of a [`ParsedInvoice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,

    pub raw_text: String,

    /// Creation time (UTC, no offset).
    pub created_at: NaiveDateTime,

    /// Last modification time (UTC, no offset).
    pub updated_at: NaiveDateTime,
}

impl InvoiceRecord {
    /// Build a new record stamped with `now`.
    pub fn from_parsed(invoice: &ParsedInvoice, now: NaiveDateTime) -> Self {
        Self {
            company_name: invoice.company_name.clone(),
            date: invoice.date,
            total_amount: invoice.total_amount,
            tax_number: invoice.tax_number.clone(),
            raw_text: invoice.raw_text.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified at `now`.
    pub fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}
