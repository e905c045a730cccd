//! Core library for Turkish receipt OCR.
//!
//! This crate provides:
//! - Image normalization (grayscale, non-local means, CLAHE, Otsu)
//! - OCR text extraction behind the [`OcrBackend`] seam (Tesseract, ONNX)
//! - Heuristic field parsing (company, date, total, VKN/TCKN, address, items)
//! - The [`InvoicePipeline`] tying the three together

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pipeline;

pub use error::{
    InvoiceProcessingError, NormalizeError, OcrError, ParseError, Result, Stage, StageError,
};
pub use invoice::FieldParser;
pub use invoice::rules::{parse_date, validate_tckn, validate_vkn};
pub use models::config::{ExtractionConfig, FisokuConfig, OcrConfig, PreprocessingConfig};
pub use models::invoice::{InvoiceRecord, LineItem, ParsedInvoice};
pub use ocr::{
    ExtractedText, FixedTextBackend, ImageNormalizer, NormalizedImage, OcrBackend, TextExtractor,
    default_backend,
};
#[cfg(feature = "onnx")]
pub use ocr::OnnxBackend;
#[cfg(feature = "tesseract")]
pub use ocr::TesseractBackend;
pub use pipeline::InvoicePipeline;
