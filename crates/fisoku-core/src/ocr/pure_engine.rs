//! Pure Rust OCR backend using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use super::{NormalizedImage, OcrBackend};
use crate::error::OcrError;

/// Rows of boxes whose tops fall in the same band of this many pixels are one line.
const ROW_BAND: f64 = 20.0;

/// OCR backend backed by `pure-onnx-ocr` (no external ONNX Runtime).
///
/// The models carry their own character set, so the language code is ignored.
pub struct OnnxBackend {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
}

impl OnnxBackend {
    /// Load `det.onnx`, `latin_rec.onnx` and `latin_dict.txt` from `model_dir`.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::Init(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
        })
    }
}

impl OcrBackend for OnnxBackend {
    fn image_to_string(&self, image: &NormalizedImage, language: &str) -> Result<String, OcrError> {
        let start = Instant::now();
        debug!("pure-onnx-ocr ignores language code {}", language);

        let rgb = DynamicImage::ImageLuma8(image.as_gray().clone()).to_rgb8();
        let input = DynamicImage::ImageRgb8(rgb);

        let engine = self
            .engine
            .lock()
            .map_err(|_| OcrError::Engine("pure-onnx-ocr engine lock poisoned".to_string()))?;
        let results = engine
            .run_from_image(&input)
            .map_err(|e| OcrError::Engine(format!("pure-onnx-ocr: {}", e)))?;

        let mut boxes: Vec<(f64, f64, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                (x, y, r.text.replace("[UNK]", " "))
            })
            .collect();
        boxes.sort_by(|a, b| reading_order((a.0, a.1), (b.0, b.1)));

        let text = join_rows(&boxes);
        info!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| (x.min(c.x), y.min(c.y)))
}

/// Top-to-bottom by row band, then left-to-right.
fn reading_order(a: (f64, f64), b: (f64, f64)) -> std::cmp::Ordering {
    let row_a = (a.1 / ROW_BAND) as i64;
    let row_b = (b.1 / ROW_BAND) as i64;
    if row_a != row_b {
        row_a.cmp(&row_b)
    } else {
        a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Boxes in the same row band are joined with spaces, rows with newlines.
fn join_rows(boxes: &[(f64, f64, String)]) -> String {
    let mut text = String::new();
    let mut current_row = None;
    for (_, y, content) in boxes {
        let row = (*y / ROW_BAND) as i64;
        match current_row {
            Some(r) if r == row => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        text.push_str(content);
        current_row = Some(row);
    }
    text
}
