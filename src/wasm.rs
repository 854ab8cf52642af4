//! WebAssembly exports for ContourStag.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! - Images are flat RGBA bytes (length = width * height * 4)
//! - Contours are flat interleaved coordinates `[x0, y0, x1, y1, ...]`
//!
//! Invalid input (wrong buffer length, too few points, out-of-range counts)
//! yields an empty result rather than a JavaScript exception.

use log::debug;
use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::config::{MaskOptions, PointLimits, SelectionConfig, SnapOptions};
use crate::mask::{composite, cut_out};
use crate::selection::edge_snap::EdgeField;
use crate::selection::geometry::Point;
use crate::selection::resample::resample_closed;
use crate::selection::spline::interpolate_closed;

fn points_from_flat(coords: &[f32]) -> Vec<Point> {
    coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

fn points_to_flat(points: &[Point]) -> Vec<f32> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

fn rgba_view(data: &[u8], width: usize, height: usize) -> Option<ArrayView3<'_, u8>> {
    match ArrayView3::from_shape((height, width, 4), data) {
        Ok(view) => Some(view),
        Err(err) => {
            debug!("invalid {}x{} RGBA buffer of {} bytes: {}", width, height, data.len(), err);
            None
        }
    }
}

// ============================================================================
// Contour Geometry
// ============================================================================

/// Resample a closed contour to `count` points equally spaced by arc length.
///
/// # Arguments
/// * `coords` - Flat interleaved contour coordinates
/// * `count` - Target point count (8-200)
///
/// # Returns
/// Flat interleaved coordinates, empty on invalid input
#[wasm_bindgen]
pub fn resample_contour_wasm(coords: &[f32], count: usize) -> Vec<f32> {
    match resample_closed(&points_from_flat(coords), count, &PointLimits::default()) {
        Ok(points) => points_to_flat(&points),
        Err(err) => {
            debug!("resample rejected: {}", err);
            Vec::new()
        }
    }
}

/// Densify control points with a closed Catmull-Rom spline (`samples` per segment).
#[wasm_bindgen]
pub fn interpolate_contour_wasm(coords: &[f32], samples: usize) -> Vec<f32> {
    points_to_flat(&interpolate_closed(&points_from_flat(coords), samples))
}

// ============================================================================
// Edge Snapping
// ============================================================================

/// Snap `(x, y)` to the nearest strong edge of an RGBA image.
///
/// # Arguments
/// * `radius` - Half-size of the search window
/// * `threshold` - Edge strength must exceed this
/// * `max_distance` - Candidates must lie strictly closer than this
///
/// # Returns
/// `[x, y]` of the snapped point (the input point when nothing qualifies)
#[wasm_bindgen]
pub fn snap_to_edge_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    x: f32,
    y: f32,
    radius: u32,
    threshold: u8,
    max_distance: f32,
) -> Vec<f32> {
    let Some(image) = rgba_view(data, width, height) else {
        return vec![x, y];
    };
    let options = SnapOptions {
        radius,
        strength_threshold: threshold,
        max_distance,
        ..SnapOptions::default()
    };
    let field = EdgeField::build(image, width, height, &options);
    let snapped = field.snap(Point::new(x, y), &options);
    vec![snapped.x, snapped.y]
}

// ============================================================================
// Masking
// ============================================================================

/// Apply a polygon (image coordinates) as the alpha channel of an RGBA image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `coords` - Flat interleaved polygon coordinates
/// * `feather` - Gaussian sigma of the edge (0 = hard)
///
/// # Returns
/// Flat RGBA bytes of the same size, empty on invalid input
#[wasm_bindgen]
pub fn composite_mask_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    coords: &[f32],
    feather: f32,
) -> Vec<u8> {
    let Some(image) = rgba_view(data, width, height) else {
        return Vec::new();
    };
    match composite(image, &points_from_flat(coords), feather) {
        Ok(result) => result.pixels.into_raw_vec_and_offset().0,
        Err(err) => {
            debug!("composite rejected: {}", err);
            Vec::new()
        }
    }
}

/// Masked crop of the region outlined by a canvas-space contour.
///
/// The crop's image-space box is `[x1, y1, x2, y2]`; its width is `x2 - x1`.
#[wasm_bindgen]
pub struct SelectionCut {
    pixels: Vec<u8>,
    bounds: [u32; 4],
}

#[wasm_bindgen]
impl SelectionCut {
    /// Flat RGBA bytes of the crop.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// `[x1, y1, x2, y2]` in image pixels.
    pub fn bounds(&self) -> Vec<u32> {
        self.bounds.to_vec()
    }
}

/// Cut the region outlined by `coords` (canvas space) out of an RGBA image.
///
/// # Returns
/// The masked crop, or `undefined` when the selection is rejected
#[wasm_bindgen]
pub fn cut_out_selection_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    coords: &[f32],
    canvas_width: u32,
    canvas_height: u32,
    padding: f32,
    feather: f32,
) -> Option<SelectionCut> {
    let image = rgba_view(data, width, height)?;
    let config = SelectionConfig::default();
    let options = MaskOptions {
        feather_radius: feather,
        ..config.mask
    };
    match cut_out(
        image,
        &points_from_flat(coords),
        (canvas_width, canvas_height),
        padding,
        config.capture.min_selection_size,
        &options,
    ) {
        Ok(result) => {
            let b = result.image_box;
            Some(SelectionCut {
                pixels: result.pixels.into_raw_vec_and_offset().0,
                bounds: [b.x1, b.y1, b.x2, b.y2],
            })
        }
        Err(err) => {
            debug!("cut out rejected: {}", err);
            None
        }
    }
}
