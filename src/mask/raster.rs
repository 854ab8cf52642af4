//! Scanline polygon fill.

use ndarray::Array2;

use crate::selection::geometry::Point;

/// Rasterize a closed polygon into a (height, width) mask of 0 / 255.
///
/// A pixel is filled when its center lies inside the polygon under the
/// even-odd rule, the same test as [`crate::selection::geometry::contains`].
pub fn rasterize_polygon(polygon: &[Point], width: usize, height: usize) -> Array2<u8> {
    let mut mask = Array2::<u8>::zeros((height, width));
    let n = polygon.len();
    if n < 3 || width == 0 || height == 0 {
        return mask;
    }

    let mut nodes: Vec<f32> = Vec::with_capacity(n);
    for y in 0..height {
        let yc = y as f32 + 0.5;

        // x-intercepts of every edge crossing this row's center line
        nodes.clear();
        let mut j = n - 1;
        for i in 0..n {
            let (vi, vj) = (polygon[i], polygon[j]);
            if (vi.y > yc) != (vj.y > yc) {
                nodes.push(vi.x + (yc - vi.y) / (vj.y - vi.y) * (vj.x - vi.x));
            }
            j = i;
        }
        nodes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Fill between pairs of intersections
        for span in nodes.chunks_exact(2) {
            let (start, end) = (span[0], span[1]);
            let x_lo = (start - 0.5).floor().max(0.0) as usize;
            let x_hi = (end.ceil().max(0.0) as usize).min(width);
            for x in x_lo..x_hi {
                let xc = x as f32 + 0.5;
                if xc >= start && xc < end {
                    mask[[y, x]] = 255;
                }
            }
        }
    }

    mask
}
