//! Bilinear resizing and cropping.
//!
//! Used to bring a reference image to canvas resolution before building the
//! edge field, and to cut the selected region out of the source image.

use ndarray::{s, Array3, ArrayView3};

/// Resize an image with bilinear interpolation (pixel-center aligned, clamped borders).
///
/// Returns a copy when the size already matches.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `new_width` - Target width in pixels
/// * `new_height` - Target height in pixels
pub fn resize_bilinear_u8(
    input: ArrayView3<u8>,
    new_width: usize,
    new_height: usize,
) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if width == new_width && height == new_height {
        return input.to_owned();
    }
    if width == 0 || height == 0 || new_width == 0 || new_height == 0 {
        return Array3::<u8>::zeros((new_height, new_width, channels));
    }

    let scale_x = width as f32 / new_width as f32;
    let scale_y = height as f32 / new_height as f32;

    Array3::from_shape_fn((new_height, new_width, channels), |(y, x, c)| {
        let sx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, (width - 1) as f32);
        let sy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, (height - 1) as f32);

        let x0 = sx.floor() as usize;
        let y0 = sy.floor() as usize;
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);
        let dx = sx - x0 as f32;
        let dy = sy - y0 as f32;

        let p00 = input[[y0, x0, c]] as f32;
        let p10 = input[[y0, x1, c]] as f32;
        let p01 = input[[y1, x0, c]] as f32;
        let p11 = input[[y1, x1, c]] as f32;

        let top = p00 * (1.0 - dx) + p10 * dx;
        let bottom = p01 * (1.0 - dx) + p11 * dx;
        (top * (1.0 - dy) + bottom * dy).round().clamp(0.0, 255.0) as u8
    })
}

/// Copy the region `[x1, x2) x [y1, y2)` out of an image.
///
/// Coordinates are clamped to the image bounds.
pub fn crop_u8(input: ArrayView3<u8>, x1: usize, y1: usize, x2: usize, y2: usize) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let x2 = x2.min(width);
    let y2 = y2.min(height);
    let x1 = x1.min(x2);
    let y1 = y1.min(y2);
    input.slice(s![y1..y2, x1..x2, ..]).to_owned()
}
