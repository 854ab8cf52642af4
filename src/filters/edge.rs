//! Luminance and Sobel gradient magnitude.
//!
//! ## Supported Formats
//!
//! Accepts images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - uses single channel directly
//! - **RGB**: (height, width, 3) - computes luminance from RGB
//! - **RGBA**: (height, width, 4) - computes luminance from RGB, ignores alpha
//!
//! Output is a single-channel plane.

use ndarray::{Array2, ArrayView3};
use rayon::prelude::*;

/// BT.709 luminosity coefficients
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// Convert an image to a BT.709 luminance plane (0.0-255.0).
pub fn luminance_plane(input: ArrayView3<u8>) -> Array2<f32> {
    let (height, width, channels) = input.dim();
    Array2::from_shape_fn((height, width), |(y, x)| {
        if channels < 3 {
            input[[y, x, 0]] as f32
        } else {
            LUMA_R * input[[y, x, 0]] as f32
                + LUMA_G * input[[y, x, 1]] as f32
                + LUMA_B * input[[y, x, 2]] as f32
        }
    })
}

/// Sobel gradient magnitude of a luminance plane.
///
/// Magnitude is clamped to 255. The one-pixel border is zero.
///
/// # Arguments
/// * `luma` - Luminance plane (height, width), values 0.0-255.0
///
/// # Returns
/// Edge strength plane (height, width), values 0-255
pub fn sobel_magnitude(luma: &Array2<f32>) -> Array2<u8> {
    let (height, width) = luma.dim();
    let mut output = Array2::<u8>::zeros((height, width));
    if height < 3 || width < 3 {
        return output;
    }

    let kernel_h: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    let kernel_v: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

    let rows: Vec<(usize, Vec<u8>)> = (1..height - 1)
        .into_par_iter()
        .map(|y| {
            let mut row = vec![0u8; width];
            for x in 1..width - 1 {
                let mut gx = 0.0f32;
                let mut gy = 0.0f32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        let lum = luma[[y + ky - 1, x + kx - 1]];
                        gx += lum * kernel_h[ky][kx];
                        gy += lum * kernel_v[ky][kx];
                    }
                }
                row[x] = (gx * gx + gy * gy).sqrt().min(255.0) as u8;
            }
            (y, row)
        })
        .collect();

    for (y, row) in rows {
        for (x, v) in row.into_iter().enumerate() {
            output[[y, x]] = v;
        }
    }

    output
}
