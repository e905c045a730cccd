//! Process command - extract data from a single receipt image.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fisoku_core::models::invoice::{InvoiceRecord, ParsedInvoice};

use super::output::{OutputFormat, format_invoice, format_record};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image (PNG, JPEG, TIFF, BMP, WebP)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR language code (overrides config)
    #[arg(short, long)]
    lang: Option<String>,

    /// Report fields that were not found
    #[arg(long)]
    validate: bool,

    /// Emit the persisted record (with timestamps) instead of all fields
    #[arg(long)]
    record: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::config::load(config_path)?;
    if let Some(lang) = &args.lang {
        config.ocr.language = lang.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = super::build_pipeline(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Running OCR...");

    let input = args.input.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.process_file(&input)).await?;

    pb.finish_and_clear();
    let invoice = result?;

    if args.validate {
        report_missing(&invoice);
    }

    let output = if args.record {
        let record = InvoiceRecord::from_parsed(&invoice, chrono::Utc::now().naive_utc());
        format_record(&record, args.format)?
    } else {
        format_invoice(&invoice, args.format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn report_missing(invoice: &ParsedInvoice) {
    let missing = invoice.missing_fields();
    if missing.is_empty() {
        eprintln!("{} All fields found", style("✓").green());
        return;
    }

    eprintln!("{}", style("Fields not found:").yellow());
    for field in missing {
        eprintln!("  - {}", field);
    }
}
