//! Arc-length-uniform resampling of closed contours.

use crate::config::PointLimits;
use crate::error::SelectionError;

use super::geometry::Point;

/// Resample a closed contour to `target` points spaced evenly by arc length.
///
/// The source is treated as closed: the first point is appended as a closing
/// vertex unless it is already duplicated at the end. Output point `i` sits at
/// arc length `i / target * perimeter`, so the first output point is the first
/// source point.
///
/// # Errors
/// * `InsufficientPoints` - fewer than 4 source points
/// * `OutOfRange` - `target` outside `limits` or below 3
/// * `DegenerateGeometry` - zero perimeter
pub fn resample_closed(
    source: &[Point],
    target: usize,
    limits: &PointLimits,
) -> Result<Vec<Point>, SelectionError> {
    if source.len() < 4 {
        return Err(SelectionError::InsufficientPoints { required: 4, actual: source.len() });
    }
    if target < 3 || !limits.contains(target) {
        return Err(SelectionError::OutOfRange {
            what: "point count",
            value: target as f32,
            min: limits.min_count.max(3) as f32,
            max: limits.max_count as f32,
        });
    }

    let mut points = source.to_vec();
    if points.first() != points.last() {
        points.push(points[0]);
    }

    // Cumulative arc length at each vertex
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0f32;
    lengths.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance_to(&pair[1]);
        lengths.push(total);
    }

    if total <= 0.0 {
        return Err(SelectionError::DegenerateGeometry("contour has zero length"));
    }

    let mut result = Vec::with_capacity(target);
    let mut j = 1;
    for i in 0..target {
        let offset = i as f32 / target as f32 * total;

        // Offsets increase monotonically, so the bracketing segment only moves forward.
        while j < lengths.len() - 1 && lengths[j] < offset {
            j += 1;
        }

        let start = lengths[j - 1];
        let segment = lengths[j] - start;
        let t = if segment > 0.0 { ((offset - start) / segment).clamp(0.0, 1.0) } else { 0.0 };
        result.push(points[j - 1].lerp(&points[j], t));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::geometry::closed_length;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance_to(&b) < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_square_to_eight() {
        let out = resample_closed(&square(), 8, &PointLimits::default()).unwrap();
        let expected = [
            (0.0, 0.0),
            (50.0, 0.0),
            (100.0, 0.0),
            (100.0, 50.0),
            (100.0, 100.0),
            (50.0, 100.0),
            (0.0, 100.0),
            (0.0, 50.0),
        ];
        assert_eq!(out.len(), 8);
        for (p, e) in out.iter().zip(expected) {
            assert_close(*p, Point::new(e.0, e.1));
        }
        for i in 0..8 {
            let step = out[i].distance_to(&out[(i + 1) % 8]);
            assert!((step - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_explicitly_closed_source_is_not_double_closed() {
        let mut closed = square();
        closed.push(Point::new(0.0, 0.0));
        let a = resample_closed(&square(), 12, &PointLimits::default()).unwrap();
        let b = resample_closed(&closed, 12, &PointLimits::default()).unwrap();
        for (p, q) in a.iter().zip(&b) {
            assert_close(*p, *q);
        }
    }

    #[test]
    fn test_exact_count_and_length_preserved() {
        let limits = PointLimits::default();
        for n in [8, 13, 50, 120, 200] {
            let out = resample_closed(&square(), n, &limits).unwrap();
            assert_eq!(out.len(), n);
            // Corners are cut unless n % 4 == 0; each cut loses at most
            // (1 - 1/sqrt(2)) of one spacing.
            let spacing = 400.0 / n as f32;
            assert!((closed_length(&out) - 400.0).abs() <= 1.2 * spacing);
        }
    }

    #[test]
    fn test_rejections() {
        let limits = PointLimits::default();
        assert_eq!(
            resample_closed(&square()[..3], 8, &limits),
            Err(SelectionError::InsufficientPoints { required: 4, actual: 3 })
        );
        for target in [0, 7, 201] {
            assert!(matches!(
                resample_closed(&square(), target, &limits),
                Err(SelectionError::OutOfRange { .. })
            ));
        }
        // Limits that admit tiny counts still never yield fewer than 3 points.
        let loose = PointLimits { min_count: 0, ..limits };
        assert!(matches!(
            resample_closed(&square(), 2, &loose),
            Err(SelectionError::OutOfRange { .. })
        ));
        let collapsed = vec![Point::new(3.0, 3.0); 6];
        assert!(matches!(
            resample_closed(&collapsed, 8, &limits),
            Err(SelectionError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_duplicate_vertices_are_skipped() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let out = resample_closed(&pts, 8, &PointLimits::default()).unwrap();
        assert_close(out[1], Point::new(50.0, 0.0));
        assert_close(out[4], Point::new(100.0, 100.0));
    }
}
