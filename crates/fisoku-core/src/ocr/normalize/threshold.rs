//! Otsu binarization.

use image::{GrayImage, Luma};

/// Pick the threshold that maximizes between-class variance.
///
/// Pixels at or below the threshold form the dark class. A raster with a
/// single intensity has no split and yields 0.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = histogram.iter().sum::<u64>() as f64;
    if total == 0.0 {
        return 0;
    }
    let total_weighted: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut best = 0u8;
    let mut best_variance = 0f64;
    let mut dark_count = 0f64;
    let mut dark_weighted = 0f64;

    for (level, &count) in histogram.iter().enumerate().take(255) {
        dark_count += count as f64;
        dark_weighted += level as f64 * count as f64;

        let light_count = total - dark_count;
        if dark_count == 0.0 || light_count == 0.0 {
            continue;
        }

        let dark_mean = dark_weighted / dark_count;
        let light_mean = (total_weighted - dark_weighted) / light_count;
        let variance = dark_count * light_count * (dark_mean - light_mean).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best = level as u8;
        }
    }

    best
}

/// Binarize with Otsu's threshold. Output pixels are strictly 0 or 255.
pub fn binarize(image: &GrayImage) -> (GrayImage, u8) {
    let threshold = otsu_threshold(image);
    let binary = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    (binary, threshold)
}
