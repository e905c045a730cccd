//! Image normalization and OCR text extraction.

pub mod normalize;

mod extractor;
#[cfg(feature = "onnx")]
mod pure_engine;
#[cfg(feature = "tesseract")]
mod tesseract;

pub use extractor::{ExtractedText, TextExtractor};
pub use normalize::{ImageNormalizer, NormalizedImage};
#[cfg(feature = "onnx")]
pub use pure_engine::OnnxBackend;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractBackend;

use crate::error::OcrError;

/// Seam to an external OCR engine.
///
/// Implementations receive the binarized raster and the configured language
/// code and return whatever text the engine recognised, whitespace included.
pub trait OcrBackend: Send + Sync {
    /// Recognise the text in `image`.
    fn image_to_string(&self, image: &NormalizedImage, language: &str) -> Result<String, OcrError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

impl<B: OcrBackend + ?Sized> OcrBackend for Box<B> {
    fn image_to_string(&self, image: &NormalizedImage, language: &str) -> Result<String, OcrError> {
        (**self).image_to_string(image, language)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Returns a preset string regardless of the image.
#[derive(Debug, Clone, Default)]
pub struct FixedTextBackend {
    text: String,
}

impl FixedTextBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for FixedTextBackend {
    fn image_to_string(&self, _image: &NormalizedImage, _language: &str) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// The backend compiled into this build, preferring Tesseract.
pub fn default_backend(config: &crate::models::config::OcrConfig) -> Result<Box<dyn OcrBackend>, OcrError> {
    #[cfg(feature = "tesseract")]
    {
        Ok(Box::new(TesseractBackend::from_config(config)))
    }

    #[cfg(all(feature = "onnx", not(feature = "tesseract")))]
    {
        Ok(Box::new(OnnxBackend::from_dir(&config.model_dir)?))
    }

    #[cfg(not(any(feature = "tesseract", feature = "onnx")))]
    {
        let _ = config;
        Err(OcrError::Unavailable(
            "build with the `tesseract` or `onnx` feature".to_string(),
        ))
    }
}
