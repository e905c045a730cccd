//! Image normalization for OCR.
//!
//! Decoded receipts go through grayscale conversion, non-local means
//! denoising, CLAHE and Otsu binarization, in that order. Thresholding before
//! denoising would turn noise into false edges.

mod clahe;
mod denoise;
mod threshold;

pub use clahe::Clahe;
pub use denoise::NlMeans;
pub use threshold::{binarize, otsu_threshold};

use std::io::Cursor;
use std::time::Instant;

use image::{DynamicImage, GrayImage, ImageFormat, imageops::FilterType};
use tracing::debug;

use crate::error::NormalizeError;
use crate::models::config::PreprocessingConfig;

/// Binary (0/255) raster ready for an OCR engine.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    image: GrayImage,
    threshold: u8,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Otsu threshold used for binarization.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_gray(self) -> GrayImage {
        self.image
    }

    /// Encode as PNG for engines that take encoded bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, NormalizeError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| NormalizeError::Encode(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

/// Turns raw image bytes into a [`NormalizedImage`].
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    max_size: u32,
    denoiser: NlMeans,
    clahe: Clahe,
}

impl ImageNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }

    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            max_size: config.max_image_size,
            denoiser: NlMeans::new(
                config.denoise_strength,
                config.denoise_patch_size,
                config.denoise_search_window,
            ),
            clahe: Clahe::new(config.clahe_clip_limit, config.clahe_tile_grid),
        }
    }

    /// Set the longer-side limit (0 disables downscaling).
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    pub fn with_denoiser(mut self, denoiser: NlMeans) -> Self {
        self.denoiser = denoiser;
        self
    }

    pub fn with_clahe(mut self, clahe: Clahe) -> Self {
        self.clahe = clahe;
        self
    }

    /// Decode `bytes` and run the full normalization chain.
    pub fn normalize(&self, bytes: &[u8]) -> Result<NormalizedImage, NormalizeError> {
        let decoded = image::load_from_memory(bytes)?;
        self.normalize_image(&decoded)
    }

    /// Run the normalization chain on an already decoded image.
    pub fn normalize_image(&self, image: &DynamicImage) -> Result<NormalizedImage, NormalizeError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(NormalizeError::EmptyImage { width, height });
        }
        debug!("Original image size: {}x{}", width, height);

        let start = Instant::now();
        let gray = match self.resize_dimensions(width, height) {
            Some((w, h)) => {
                debug!("Downscaling to {}x{}", w, h);
                image.resize_exact(w, h, FilterType::Lanczos3).to_luma8()
            }
            None => image.to_luma8(),
        };

        let denoised = self.denoiser.apply(&gray);
        debug!("Denoised in {}ms", start.elapsed().as_millis());

        let enhanced = self.clahe.apply(&denoised);
        let (binary, threshold) = binarize(&enhanced);
        debug!(
            "Normalized {}x{} in {}ms (otsu threshold {})",
            binary.width(),
            binary.height(),
            start.elapsed().as_millis(),
            threshold
        );

        Ok(NormalizedImage {
            image: binary,
            threshold,
        })
    }

    fn resize_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let max_dim = width.max(height);
        if self.max_size == 0 || max_dim <= self.max_size {
            return None;
        }

        let scale = self.max_size as f32 / max_dim as f32;
        let new_width = (width as f32 * scale).round() as u32;
        let new_height = (height as f32 * scale).round() as u32;
        Some((new_width.clamp(1, self.max_size), new_height.clamp(1, self.max_size)))
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn fast() -> ImageNormalizer {
        ImageNormalizer::new().with_denoiser(NlMeans::new(3.0, 3, 5))
    }

    #[test]
    fn test_normalize_color_png() {
        let receipt = RgbImage::from_fn(40, 30, |x, y| {
            if (10..30).contains(&x) && (12..16).contains(&y) {
                Rgb([20, 20, 30])
            } else {
                Rgb([235, 230, 220])
            }
        });
        let normalized = fast().normalize(&png_bytes(DynamicImage::ImageRgb8(receipt))).unwrap();

        assert_eq!((normalized.width(), normalized.height()), (40, 30));
        assert!(normalized.as_gray().pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(normalized.as_gray().get_pixel(20, 14)[0], 0);
        assert_eq!(normalized.as_gray().get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn test_corrupt_bytes_fail_to_decode() {
        let err = fast().normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, NormalizeError::Decode(_)));
    }

    #[test]
    fn test_empty_bytes_fail_to_decode() {
        assert!(fast().normalize(&[]).is_err());
    }

    #[test]
    fn test_zero_size_image_rejected() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        let err = fast().normalize_image(&empty).unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyImage { .. }));
    }

    #[test]
    fn test_downscales_oversized_input() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 100, Luma([200])));
        let normalized = fast().with_max_size(50).normalize_image(&image).unwrap();
        assert_eq!((normalized.width(), normalized.height()), (50, 25));
    }

    #[test]
    fn test_resize_dimensions() {
        let normalizer = ImageNormalizer::new().with_max_size(960);
        assert_eq!(normalizer.resize_dimensions(500, 300), None);
        assert_eq!(normalizer.resize_dimensions(1920, 1080), Some((960, 540)));
        assert_eq!(normalizer.with_max_size(0).resize_dimensions(9000, 10), None);
    }

    #[test]
    fn test_small_sizes_binarize_cleanly() {
        let normalizer = fast();
        let sizes = (1..=64u32).flat_map(|n| [(n, 9), (9, n), (n, n), (n, 64 - n + 1)]);
        for (w, h) in sizes {
            let image = DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
                Luma([if (x + 2 * y) % 5 < 2 { 30 } else { 220 }])
            }));
            let normalized = normalizer.normalize_image(&image).unwrap();
            assert_eq!((normalized.width(), normalized.height()), (w, h));
            assert!(
                normalized.as_gray().pixels().all(|p| p[0] == 0 || p[0] == 255),
                "non-binary output at {}x{}",
                w,
                h
            );
        }
    }

    #[test]
    fn test_png_round_trip_keeps_size() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 6, Luma([10])));
        let normalized = fast().normalize_image(&image).unwrap();
        let decoded = image::load_from_memory(&normalized.to_png().unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }
}
