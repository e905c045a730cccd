//! OCR invocation over a normalized image.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{NormalizedImage, OcrBackend};
use crate::error::OcrError;

/// Text recognised on one receipt.
///
/// Always holds at least one non-blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    raw: String,
    lines: Vec<String>,
}

impl ExtractedText {
    /// Wrap engine output, rejecting text that is only whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, OcrError> {
        let raw = raw.into();
        let lines: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if lines.is_empty() {
            return Err(OcrError::NoTextFound);
        }

        Ok(Self { raw, lines })
    }

    /// The engine output as returned.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Non-empty, trimmed lines in reading order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Runs an [`OcrBackend`] with a fixed language.
#[derive(Debug, Clone)]
pub struct TextExtractor<B> {
    backend: B,
    language: String,
}

impl<B: OcrBackend> TextExtractor<B> {
    pub fn new(backend: B, language: impl Into<String>) -> Self {
        Self {
            backend,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Recognise the text in `image`.
    pub fn extract_text(&self, image: &NormalizedImage) -> Result<ExtractedText, OcrError> {
        let start = Instant::now();
        debug!(
            "Running {} OCR ({}) on {}x{} image",
            self.backend.name(),
            self.language,
            image.width(),
            image.height()
        );

        let raw = self.backend.image_to_string(image, &self.language)?;
        let text = ExtractedText::new(raw)?;

        info!(
            "OCR complete: {} lines in {}ms",
            text.lines().len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{FixedTextBackend, ImageNormalizer};
    use pretty_assertions::assert_eq;

    fn blank_image() -> NormalizedImage {
        ImageNormalizer::new()
            .normalize_image(&image::DynamicImage::new_luma8(6, 6))
            .unwrap()
    }

    #[test]
    fn test_lines_trimmed_and_non_empty() {
        let text = ExtractedText::new("  ÖRNEK MARKET \n\n\t\nTOPLAM 12,00\r\n").unwrap();
        assert_eq!(text.lines(), &["ÖRNEK MARKET", "TOPLAM 12,00"]);
        assert!(text.raw().starts_with("  ÖRNEK"));
    }

    #[test]
    fn test_whitespace_is_no_text() {
        assert!(matches!(ExtractedText::new(" \n\t \n"), Err(OcrError::NoTextFound)));
        assert!(matches!(ExtractedText::new(""), Err(OcrError::NoTextFound)));
    }

    #[test]
    fn test_extractor_passes_language() {
        struct Echo;
        impl OcrBackend for Echo {
            fn image_to_string(&self, _: &NormalizedImage, language: &str) -> Result<String, OcrError> {
                Ok(format!("lang {language}"))
            }
            fn name(&self) -> &str {
                "echo"
            }
        }

        let text = TextExtractor::new(Echo, "tur").extract_text(&blank_image()).unwrap();
        assert_eq!(text.lines(), &["lang tur"]);
    }

    #[test]
    fn test_extractor_rejects_blank_output() {
        let extractor = TextExtractor::new(FixedTextBackend::new("   "), "tur");
        assert!(matches!(
            extractor.extract_text(&blank_image()),
            Err(OcrError::NoTextFound)
        ));
    }
}
