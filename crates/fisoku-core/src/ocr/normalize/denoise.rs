//! Non-local means denoising for grayscale receipts.
//!
//! Each output pixel is a weighted mean of the pixels in a search window
//! around it, weighted by how similar the patch around each candidate is to
//! the patch around the pixel being denoised. Patch distances are computed
//! one search offset at a time from an integral image of squared
//! differences, so the cost per pixel does not depend on the patch size.

use image::{GrayImage, Luma};

/// Weights for `distance / h^2` above this are treated as zero.
const WEIGHT_CUTOFF: f32 = 30.0;

/// Non-local means parameters.
#[derive(Debug, Clone, Copy)]
pub struct NlMeans {
    /// Filter strength. Larger values smooth more.
    pub strength: f32,
    /// Patch side (odd).
    pub patch_size: u32,
    /// Search window side (odd).
    pub search_window: u32,
}

impl NlMeans {
    pub fn new(strength: f32, patch_size: u32, search_window: u32) -> Self {
        Self {
            strength,
            patch_size: make_odd(patch_size),
            search_window: make_odd(search_window),
        }
    }

    /// Denoise `image`, returning a new raster of the same size.
    pub fn apply(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        if self.strength <= 0.0 || width == 0 || height == 0 {
            return image.clone();
        }

        let patch_radius = (self.patch_size / 2) as usize;
        let search_radius = (self.search_window / 2) as isize;
        let pad = search_radius as usize + patch_radius;

        let w = width as usize;
        let h = height as usize;
        let padded = Padded::new(image, pad);

        // Region over which squared differences are needed: the image plus a
        // patch radius on every side.
        let region_w = w + 2 * patch_radius;
        let region_h = h + 2 * patch_radius;
        let origin = pad - patch_radius;
        let patch_area = (self.patch_size * self.patch_size) as f64;
        let inv_h2 = 1.0 / (self.strength * self.strength);

        let mut weight_sum = vec![0f32; w * h];
        let mut value_sum = vec![0f32; w * h];
        let mut integral = vec![0f64; (region_w + 1) * (region_h + 1)];

        for dy in -search_radius..=search_radius {
            for dx in -search_radius..=search_radius {
                // Integral image of squared differences for this offset.
                for b in 0..region_h {
                    let mut row_sum = 0f64;
                    let v = origin + b;
                    let v_shift = (v as isize + dy) as usize;
                    for a in 0..region_w {
                        let u = origin + a;
                        let u_shift = (u as isize + dx) as usize;
                        let diff = padded.at(u, v) - padded.at(u_shift, v_shift);
                        row_sum += (diff * diff) as f64;
                        integral[(b + 1) * (region_w + 1) + a + 1] =
                            integral[b * (region_w + 1) + a + 1] + row_sum;
                    }
                }

                let side = 2 * patch_radius + 1;
                for y in 0..h {
                    for x in 0..w {
                        let top = y * (region_w + 1);
                        let bottom = (y + side) * (region_w + 1);
                        let sum = integral[bottom + x + side] - integral[top + x + side]
                            - integral[bottom + x]
                            + integral[top + x];
                        let distance = (sum / patch_area) as f32 * inv_h2;
                        if distance > WEIGHT_CUTOFF {
                            continue;
                        }

                        let weight = (-distance).exp();
                        let sx = (x + pad) as isize + dx;
                        let sy = (y + pad) as isize + dy;
                        value_sum[y * w + x] += weight * padded.at(sx as usize, sy as usize);
                        weight_sum[y * w + x] += weight;
                    }
                }
            }
        }

        GrayImage::from_fn(width, height, |x, y| {
            let i = y as usize * w + x as usize;
            // The zero offset always contributes weight 1.
            let value = value_sum[i] / weight_sum[i];
            Luma([value.round().clamp(0.0, 255.0) as u8])
        })
    }
}

impl Default for NlMeans {
    fn default() -> Self {
        Self::new(3.0, 7, 21)
    }
}

fn make_odd(size: u32) -> u32 {
    if size % 2 == 0 { size + 1 } else { size.max(1) }
}

/// Grayscale raster padded by edge replication, stored as `f32`.
struct Padded {
    data: Vec<f32>,
    stride: usize,
}

impl Padded {
    fn new(image: &GrayImage, pad: usize) -> Self {
        let (width, height) = image.dimensions();
        let w = width as usize;
        let h = height as usize;
        let stride = w + 2 * pad;
        let rows = h + 2 * pad;

        let mut data = Vec::with_capacity(stride * rows);
        for v in 0..rows {
            let y = v.saturating_sub(pad).min(h - 1) as u32;
            for u in 0..stride {
                let x = u.saturating_sub(pad).min(w - 1) as u32;
                data.push(image.get_pixel(x, y)[0] as f32);
            }
        }

        Self { data, stride }
    }

    #[inline]
    fn at(&self, u: usize, v: usize) -> f32 {
        self.data[v * self.stride + u]
    }
}
