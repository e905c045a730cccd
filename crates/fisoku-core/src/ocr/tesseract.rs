//! Tesseract backend via `leptess`.

use std::path::PathBuf;

use leptess::LepTess;
use tracing::debug;

use super::{NormalizedImage, OcrBackend};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs Tesseract on the PNG-encoded normalized image.
///
/// A fresh engine is created per call; `LepTess` is neither `Send` nor `Sync`.
#[derive(Debug, Clone, Default)]
pub struct TesseractBackend {
    tessdata_path: Option<PathBuf>,
}

impl TesseractBackend {
    pub fn new(tessdata_path: Option<PathBuf>) -> Self {
        Self { tessdata_path }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.tessdata_path.clone())
    }
}

impl OcrBackend for TesseractBackend {
    fn image_to_string(&self, image: &NormalizedImage, language: &str) -> Result<String, OcrError> {
        let data_path = match &self.tessdata_path {
            Some(path) => Some(path.to_str().ok_or_else(|| {
                OcrError::Init(format!("tessdata path is not UTF-8: {}", path.display()))
            })?),
            None => None,
        };

        let mut tess = LepTess::new(data_path, language)
            .map_err(|e| OcrError::Init(format!("tesseract ({language}): {e}")))?;

        let png = image
            .to_png()
            .map_err(|e| OcrError::Engine(e.to_string()))?;
        debug!("Handing {} byte PNG to tesseract", png.len());

        tess.set_image_from_mem(&png)
            .map_err(|e| OcrError::Engine(format!("tesseract: {e}")))?;
        tess.get_utf8_text()
            .map_err(|e| OcrError::Engine(format!("tesseract: {e}")))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
