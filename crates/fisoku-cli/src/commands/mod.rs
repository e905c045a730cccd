//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod parse;
pub mod process;

use fisoku_core::models::config::FisokuConfig;
use fisoku_core::{InvoicePipeline, OcrBackend, default_backend};
use tracing::debug;

/// Pipeline over whichever OCR backend this binary was built with.
pub fn build_pipeline(config: &FisokuConfig) -> anyhow::Result<InvoicePipeline<Box<dyn OcrBackend>>> {
    let backend = default_backend(&config.ocr)?;
    debug!("Using {} OCR backend ({})", backend.name(), config.ocr.language);
    Ok(InvoicePipeline::from_config(config, backend)?)
}
