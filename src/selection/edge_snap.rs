//! Edge field and nearest-strong-edge lookup.
//!
//! The field is the Sobel gradient magnitude of the reference image at canvas
//! resolution, lightly blurred so that isolated noisy pixels do not attract
//! points. Snapping is advisory: it moves a point once, at placement time.

use log::debug;
use ndarray::{Array2, ArrayView3};

use crate::config::SnapOptions;
use crate::filters::core::blur_plane_u8;
use crate::filters::edge::{luminance_plane, sobel_magnitude};
use crate::filters::resize::resize_bilinear_u8;

use super::geometry::Point;

/// Per-pixel edge strength (0-255) at canvas resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeField {
    strength: Array2<u8>,
}

impl EdgeField {
    /// Build the field from a reference image scaled to `canvas_width x canvas_height`.
    pub fn build(
        image: ArrayView3<u8>,
        canvas_width: usize,
        canvas_height: usize,
        options: &SnapOptions,
    ) -> Self {
        let (height, width, _) = image.dim();
        let luma = if width == canvas_width && height == canvas_height {
            luminance_plane(image)
        } else {
            let scaled = resize_bilinear_u8(image, canvas_width, canvas_height);
            luminance_plane(scaled.view())
        };

        let strength = blur_plane_u8(&sobel_magnitude(&luma), options.smoothing_sigma);
        debug!(
            "edge field built: {}x{} from {}x{} image",
            canvas_width, canvas_height, width, height
        );
        Self { strength }
    }

    /// Wrap a precomputed strength plane of shape (height, width).
    pub fn from_strength(strength: Array2<u8>) -> Self {
        Self { strength }
    }

    pub fn width(&self) -> usize {
        self.strength.dim().1
    }

    pub fn height(&self) -> usize {
        self.strength.dim().0
    }

    pub fn strength(&self) -> &Array2<u8> {
        &self.strength
    }

    /// Strength at integer pixel `(x, y)`, or 0 outside the field.
    pub fn at(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return 0;
        }
        self.strength[[y as usize, x as usize]]
    }

    /// Move `p` to the nearest strong edge pixel, if one is close enough.
    ///
    /// The query point is clamped into the field and rounded to whole pixels. Cells in
    /// the `(2 * radius + 1)^2` window qualify when their strength exceeds
    /// `options.strength_threshold` and their distance to the query point is below
    /// `options.max_distance`. The nearest qualifying cell wins; ties go to the
    /// first one in row-major order. Without a candidate `p` is returned as is.
    pub fn snap(&self, p: Point, options: &SnapOptions) -> Point {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return p;
        }

        let cx = (p.x.round() as i64).clamp(0, width as i64 - 1);
        let cy = (p.y.round() as i64).clamp(0, height as i64 - 1);
        let r = options.radius as i64;

        let mut best: Option<(i64, i64)> = None;
        let mut best_dist = f32::INFINITY;

        for dy in -r..=r {
            let ny = cy + dy;
            if ny < 0 || ny >= height as i64 {
                continue;
            }
            for dx in -r..=r {
                let nx = cx + dx;
                if nx < 0 || nx >= width as i64 {
                    continue;
                }

                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist < best_dist
                    && dist < options.max_distance
                    && self.strength[[ny as usize, nx as usize]] > options.strength_threshold
                {
                    best_dist = dist;
                    best = Some((nx, ny));
                }
            }
        }

        match best {
            Some((x, y)) => Point::new(x as f32, y as f32),
            None => p,
        }
    }
}
