//! Configuration structures for the receipt pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the fisoku pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FisokuConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Image normalization configuration.
    pub preprocessing: PreprocessingConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language code handed to the engine (Tesseract traineddata name).
    pub language: String,

    /// Directory holding `<language>.traineddata`; `None` uses the system default.
    pub tessdata_path: Option<PathBuf>,

    /// Directory holding ONNX models for the `onnx` backend.
    pub model_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "tur".to_string(),
            tessdata_path: None,
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Image normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Longer-side limit before downscaling (0 = never downscale).
    pub max_image_size: u32,

    /// Non-local means filter strength; 0 disables denoising.
    pub denoise_strength: f32,

    /// Side of the square patch compared by the denoiser (odd).
    pub denoise_patch_size: u32,

    /// Side of the square search window of the denoiser (odd).
    pub denoise_search_window: u32,

    /// CLAHE clip limit, relative to the mean histogram bin height.
    pub clahe_clip_limit: f32,

    /// CLAHE tile grid (columns, rows).
    pub clahe_tile_grid: (u32, u32),
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            max_image_size: 2800,
            denoise_strength: 3.0,
            denoise_patch_size: 7,
            denoise_search_window: 21,
            clahe_clip_limit: 2.0,
            clahe_tile_grid: (8, 8),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How many leading lines are searched for the company name.
    pub company_scan_lines: usize,

    /// Unlabelled amounts at or below this are not taken as the total.
    pub min_total_amount: Decimal,

    /// Skip tax numbers that fail the VKN/TCKN checksum.
    pub validate_tax_number: bool,

    /// Business-entity and shop-type markers.
    pub company_keywords: Vec<String>,

    /// Street, building, block and floor markers.
    pub address_keywords: Vec<String>,

    /// Tax-registry markers.
    pub tax_keywords: Vec<String>,

    /// VAT markers.
    pub vat_keywords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_scan_lines: 5,
            min_total_amount: Decimal::TEN,
            validate_tax_number: false,
            company_keywords: to_strings(&[
                "A.Ş.", "A.S.", "AŞ", "LTD", "ŞTİ", "STI", "TİC", "TIC", "SAN", "ECZANE",
                "ECZANESİ", "MARKET", "MARKETİ", "MAĞAZA", "MAĞAZALARI", "GIDA", "PETROL",
                "HOLDİNG",
            ]),
            address_keywords: to_strings(&[
                "MAH", "MAHALLESİ", "CAD", "CADDESİ", "CD", "SOK", "SOKAK", "SOKAĞI", "SK",
                "BULVARI", "BLV", "APT", "APARTMANI", "BLOK", "KAT", "DAİRE", "İŞHANI",
                "PLAZA",
            ]),
            tax_keywords: to_strings(&["VKN", "TCKN", "VERGİ", "VERGI", "V.D.", "VD"]),
            vat_keywords: to_strings(&["KDV", "TOPKDV", "K.D.V.", "VAT"]),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl FisokuConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
