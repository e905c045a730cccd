//! Output formatting shared by the commands.

use fisoku_core::models::invoice::{InvoiceRecord, ParsedInvoice};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_invoice(invoice: &ParsedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

pub fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record([
                "company_name",
                "date",
                "total_amount",
                "tax_number",
                "created_at",
                "updated_at",
            ])?;
            wtr.write_record([
                record.company_name.clone().unwrap_or_default(),
                opt(record.date),
                opt(record.total_amount),
                record.tax_number.clone().unwrap_or_default(),
                record.created_at.to_string(),
                record.updated_at.to_string(),
            ])?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str(&format!("Company: {}\n", dash(&record.company_name)));
            output.push_str(&format!("Date:    {}\n", dash(&record.date)));
            output.push_str(&format!("Total:   {}\n", dash(&record.total_amount)));
            output.push_str(&format!("Tax no:  {}\n", dash(&record.tax_number)));
            output.push_str(&format!("Created: {}\n", record.created_at));
            Ok(output)
        }
    }
}

/// Column order of [`csv_row`].
pub const CSV_HEADER: [&str; 9] = [
    "company_name",
    "date",
    "total_amount",
    "tax_number",
    "address",
    "phone",
    "receipt_number",
    "vat_amount",
    "line_items",
];

pub fn csv_row(invoice: &ParsedInvoice) -> [String; 9] {
    [
        invoice.company_name.clone().unwrap_or_default(),
        opt(invoice.date),
        opt(invoice.total_amount),
        invoice.tax_number.clone().unwrap_or_default(),
        invoice.address.clone().unwrap_or_default(),
        invoice.phone.clone().unwrap_or_default(),
        invoice.receipt_number.clone().unwrap_or_default(),
        opt(invoice.vat_amount),
        invoice.line_items.len().to_string(),
    ]
}

fn format_csv(invoice: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(invoice))?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

pub fn format_text(invoice: &ParsedInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Company: {}\n", dash(&invoice.company_name)));
    output.push_str(&format!("Date:    {}\n", dash(&invoice.date.map(|d| d.date()))));
    output.push_str(&format!("Tax no:  {}\n", dash(&invoice.tax_number)));
    output.push_str(&format!("Address: {}\n", dash(&invoice.address)));
    output.push_str(&format!("Phone:   {}\n", dash(&invoice.phone)));
    output.push_str(&format!("Receipt: {}\n", dash(&invoice.receipt_number)));
    output.push('\n');

    if !invoice.line_items.is_empty() {
        output.push_str("Items:\n");
        for item in &invoice.line_items {
            output.push_str(&format!("  {:<30} {:>10}\n", item.label, item.price));
        }
        output.push('\n');
    }

    output.push_str(&format!("VAT:   {}\n", dash(&invoice.vat_amount)));
    output.push_str(&format!("Total: {}\n", dash(&invoice.total_amount)));

    output
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn dash<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn invoice() -> ParsedInvoice {
        ParsedInvoice {
            company_name: Some("ÖRNEK MARKET A.Ş.".to_string()),
            total_amount: Some(Decimal::new(15675, 2)),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_invoice(&invoice(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("company_name,date,total_amount"));
        assert_eq!(lines.next().unwrap(), "ÖRNEK MARKET A.Ş.,,156.75,,,,,,0");
    }

    #[test]
    fn test_text_marks_missing_fields() {
        let text = format_text(&invoice());
        assert!(text.contains("Total: 156.75"));
        assert!(text.contains("Tax no:  -"));
    }
}
