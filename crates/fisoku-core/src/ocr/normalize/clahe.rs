//! Contrast-limited adaptive histogram equalization.

use image::{GrayImage, Luma};

const BINS: usize = 256;

/// CLAHE parameters.
#[derive(Debug, Clone, Copy)]
pub struct Clahe {
    /// Clip limit relative to the mean bin height of a tile histogram.
    pub clip_limit: f32,
    /// Tile grid (columns, rows).
    pub grid: (u32, u32),
}

impl Clahe {
    pub fn new(clip_limit: f32, grid: (u32, u32)) -> Self {
        Self {
            clip_limit,
            grid: (grid.0.max(1), grid.1.max(1)),
        }
    }

    /// Equalize `image` tile by tile, blending neighbouring tile mappings
    /// bilinearly so tile borders do not show.
    pub fn apply(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return image.clone();
        }

        let tile_w = width.div_ceil(self.grid.0.min(width));
        let tile_h = height.div_ceil(self.grid.1.min(height));
        // Rounding the tile size up can leave fewer tiles than the grid asks for.
        let tiles_x = width.div_ceil(tile_w);
        let tiles_y = height.div_ceil(tile_h);

        let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let x0 = tx * tile_w;
                let y0 = ty * tile_h;
                let x1 = (x0 + tile_w).min(width);
                let y1 = (y0 + tile_h).min(height);
                luts.push(self.tile_lut(image, x0, y0, x1, y1));
            }
        }

        let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];
        let inv_tw = 1.0 / tile_w as f32;
        let inv_th = 1.0 / tile_h as f32;

        GrayImage::from_fn(width, height, |x, y| {
            let value = image.get_pixel(x, y)[0] as usize;

            let (tx1, tx2, xa) = neighbours(x as f32 * inv_tw - 0.5, tiles_x);
            let (ty1, ty2, ya) = neighbours(y as f32 * inv_th - 0.5, tiles_y);

            let top = lut_at(tx1, ty1)[value] as f32 * (1.0 - xa) + lut_at(tx2, ty1)[value] as f32 * xa;
            let bottom =
                lut_at(tx1, ty2)[value] as f32 * (1.0 - xa) + lut_at(tx2, ty2)[value] as f32 * xa;
            let mixed = top * (1.0 - ya) + bottom * ya;

            Luma([mixed.round().clamp(0.0, 255.0) as u8])
        })
    }

    /// Clipped, redistributed, cumulative mapping for one tile.
    fn tile_lut(&self, image: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> [u8; BINS] {
        let mut histogram = [0u32; BINS];
        for y in y0..y1 {
            for x in x0..x1 {
                histogram[image.get_pixel(x, y)[0] as usize] += 1;
            }
        }

        let total = (x1 - x0) * (y1 - y0);
        let limit = ((self.clip_limit * total as f32 / BINS as f32) as u32).max(1);

        let mut excess = 0u32;
        for count in histogram.iter_mut() {
            if *count > limit {
                excess += *count - limit;
                *count = limit;
            }
        }

        let batch = excess / BINS as u32;
        let residual = (excess % BINS as u32) as usize;
        for count in histogram.iter_mut() {
            *count += batch;
        }
        if residual > 0 {
            let step = (BINS / residual).max(1);
            for i in (0..BINS).step_by(step).take(residual) {
                histogram[i] += 1;
            }
        }

        let scale = 255.0 / total as f32;
        let mut lut = [0u8; BINS];
        let mut cumulative = 0u32;
        for (i, count) in histogram.iter().enumerate() {
            cumulative += count;
            lut[i] = (cumulative as f32 * scale).round().min(255.0) as u8;
        }
        lut
    }
}

impl Default for Clahe {
    fn default() -> Self {
        Self::new(2.0, (8, 8))
    }
}

/// Neighbouring tile indices and the blend factor towards the second one.
fn neighbours(position: f32, tiles: u32) -> (u32, u32, f32) {
    let first = position.floor();
    let weight = position - first;
    let last = tiles as i64 - 1;
    let t1 = (first as i64).clamp(0, last) as u32;
    let t2 = (first as i64 + 1).clamp(0, last) as u32;
    (t1, t2, weight)
}
