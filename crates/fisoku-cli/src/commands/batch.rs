//! Batch processing command for multiple receipt images.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fisoku_core::models::invoice::ParsedInvoice;

use super::output::{CSV_HEADER, OutputFormat, csv_row, format_invoice};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<ParsedInvoice, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;

    let files = collect_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = Arc::new(super::build_pipeline(&config)?);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = {
            let pipeline = Arc::clone(&pipeline);
            let path = path.clone();
            tokio::task::spawn_blocking(move || pipeline.process_file(&path)).await?
        };
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(invoice) => {
                if let Some(output_dir) = &args.output_dir {
                    write_output(output_dir, &path, &invoice, args.format)?;
                }
                results.push(ProcessResult {
                    path,
                    outcome: Ok(invoice),
                    processing_time_ms,
                });
            }
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {}", path.display(), e);
                results.push(ProcessResult {
                    path,
                    outcome: Err(e.to_string()),
                    processing_time_ms,
                });
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                overall_pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

/// Expand the glob, keeping files whose extension is a known image format.
fn collect_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && ImageFormat::from_path(p).is_ok())
        .collect();
    files.sort();
    Ok(files)
}

fn write_output(
    output_dir: &Path,
    input: &Path,
    invoice: &ParsedInvoice,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let output_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

    fs::write(&output_path, format_invoice(invoice, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &result.outcome {
            Ok(invoice) => {
                row.push("success".to_string());
                row.extend(csv_row(invoice));
                row.push(result.processing_time_ms.to_string());
                row.push(String::new());
            }
            Err(message) => {
                row.push("error".to_string());
                row.extend(std::iter::repeat_n(String::new(), CSV_HEADER.len()));
                row.push(result.processing_time_ms.to_string());
                row.push(message.clone());
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
