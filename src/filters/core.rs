//! Core utilities shared by the edge field and the mask compositor:
//! - Gaussian kernel generation
//! - Separable Gaussian blur of single-channel planes
//! - Re-thresholding of blurred masks

use ndarray::{Array2, Zip};

use crate::config::EdgeMode;

/// Generate a 1D Gaussian kernel.
///
/// # Arguments
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Normalized 1D kernel as Vec<f32>
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    // Kernel size = 6 sigma (covers 99.7% of distribution), ensure odd
    let kernel_size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = kernel_size / 2;

    let mut kernel: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Apply separable Gaussian blur to a single-channel u8 plane.
///
/// Borders are clamped. Both passes run row-parallel.
///
/// # Arguments
/// * `plane` - 2D array (height, width), e.g. a mask or an edge field
/// * `sigma` - Blur radius (standard deviation)
///
/// # Returns
/// Blurred plane with the same dimensions
pub fn blur_plane_u8(plane: &Array2<u8>, sigma: f32) -> Array2<u8> {
    if sigma <= 0.0 {
        return plane.clone();
    }

    let (height, width) = plane.dim();
    if height == 0 || width == 0 {
        return plane.clone();
    }

    let kernel = gaussian_kernel_1d(sigma);
    let half = kernel.len() / 2;

    // Horizontal pass
    let mut temp = Array2::<f32>::zeros((height, width));
    Zip::indexed(&mut temp).par_for_each(|(y, x), t| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let sx = (x as isize + ki as isize - half as isize)
                .clamp(0, width as isize - 1) as usize;
            sum += plane[[y, sx]] as f32 * kv;
        }
        *t = sum;
    });

    // Vertical pass
    let mut result = Array2::<u8>::zeros((height, width));
    Zip::indexed(&mut result).par_for_each(|(y, x), r| {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let sy = (y as isize + ki as isize - half as isize)
                .clamp(0, height as isize - 1) as usize;
            sum += temp[[sy, x]] * kv;
        }
        *r = sum.round().clamp(0.0, 255.0) as u8;
    });

    result
}

/// Re-threshold a blurred mask at `cutoff`.
///
/// `Hard` maps everything above the cutoff to 255 and the rest to 0.
/// `Soft` maps values at or below the cutoff to 0 and linearly stretches
/// `(cutoff, 255]` onto `(0, 255]`.
pub fn rethreshold(mask: &Array2<u8>, cutoff: u8, mode: EdgeMode) -> Array2<u8> {
    let span = (255 - cutoff as u32).max(1) as f32;
    mask.mapv(|v| {
        if v <= cutoff {
            return 0;
        }
        match mode {
            EdgeMode::Hard => 255,
            EdgeMode::Soft => {
                let ramp = (v - cutoff) as f32 / span * 255.0;
                ramp.round().clamp(1.0, 255.0) as u8
            }
        }
    })
}
