//! Closed Catmull-Rom interpolation.
//!
//! Densifies sparse control points into a smooth closed curve. Each segment
//! `i` runs from control point `i` to `i + 1` using neighbors
//! `(i - 1, i, i + 1, i + 2) mod n` with tangent scale 0.5. Sampling uses
//! `t = k / samples` for `k` in `0..samples`, so the loop carries no duplicate
//! closing point.

use super::geometry::Point;

/// Evaluate one Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1]`.
#[inline]
pub fn catmull_rom_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let eval = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(eval(p0.x, p1.x, p2.x, p3.x), eval(p0.y, p1.y, p2.y, p3.y))
}

/// Interpolate a closed contour with `samples` points per control segment.
///
/// Returns the control points unchanged when fewer than 3 are given or
/// `samples` is zero.
pub fn interpolate_closed(control: &[Point], samples: usize) -> Vec<Point> {
    let n = control.len();
    if n < 3 || samples == 0 {
        return control.to_vec();
    }

    let mut result = Vec::with_capacity(n * samples);
    for i in 0..n {
        let p0 = control[(i + n - 1) % n];
        let p1 = control[i];
        let p2 = control[(i + 1) % n];
        let p3 = control[(i + 2) % n];

        for k in 0..samples {
            let t = k as f32 / samples as f32;
            result.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }

    result
}
