//! Receipt pipeline: normalize, extract text, parse fields.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{InvoiceProcessingError, Result};
use crate::invoice::FieldParser;
use crate::models::config::FisokuConfig;
use crate::models::invoice::ParsedInvoice;
use crate::ocr::{ImageNormalizer, OcrBackend, TextExtractor};

/// Runs the three stages in strict sequence.
///
/// Holds no per-run state; one instance can process any number of receipts.
pub struct InvoicePipeline<B: OcrBackend> {
    normalizer: ImageNormalizer,
    extractor: TextExtractor<B>,
    parser: FieldParser,
}

impl<B: OcrBackend> InvoicePipeline<B> {
    pub fn new(normalizer: ImageNormalizer, extractor: TextExtractor<B>, parser: FieldParser) -> Self {
        Self {
            normalizer,
            extractor,
            parser,
        }
    }

    /// Build every stage from `config` around `backend`.
    pub fn from_config(config: &FisokuConfig, backend: B) -> Result<Self> {
        Ok(Self::new(
            ImageNormalizer::from_config(&config.preprocessing),
            TextExtractor::new(backend, config.ocr.language.clone()),
            FieldParser::new(&config.extraction)?,
        ))
    }

    pub fn parser(&self) -> &FieldParser {
        &self.parser
    }

    /// Process encoded image bytes into parsed fields.
    pub fn process_invoice(&self, bytes: &[u8]) -> Result<ParsedInvoice> {
        let start = Instant::now();
        self.run(bytes)
            .inspect(|invoice| {
                info!(
                    "Processed receipt in {}ms ({} fields missing)",
                    start.elapsed().as_millis(),
                    invoice.missing_fields().len()
                );
            })
            .inspect_err(|e| warn!("{} stage failed: {}", e.stage(), e))
    }

    /// Read an image file and process it.
    pub fn process_file(&self, path: &Path) -> Result<ParsedInvoice> {
        debug!("Reading {}", path.display());
        let bytes = std::fs::read(path).map_err(InvoiceProcessingError::from)?;
        self.process_invoice(&bytes)
    }

    fn run(&self, bytes: &[u8]) -> Result<ParsedInvoice> {
        let normalized = self.normalizer.normalize(bytes)?;
        debug!(
            "Normalized to {}x{} (threshold {})",
            normalized.width(),
            normalized.height(),
            normalized.threshold()
        );

        let text = self.extractor.extract_text(&normalized)?;
        drop(normalized);

        Ok(self.parser.parse(&text)?)
    }
}
