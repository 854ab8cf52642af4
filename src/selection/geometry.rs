//! Points, closed contours and bounding boxes.

/// A 2D point with sub-pixel precision, in screen or image space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` (t = 0 returns self).
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point::new(self.x + t * (other.x - self.x), self.y + t * (other.y - self.y))
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Perimeter of a closed polyline, including the closing segment.
pub fn closed_length(points: &[Point]) -> f32 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| points[i].distance_to(&points[(i + 1) % n])).sum()
}

/// Even-odd point-in-polygon test for a closed contour.
pub fn contains(polygon: &[Point], p: Point) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (polygon[i], polygon[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = vi.x + (p.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Index of the first point (in contour order) strictly within `radius` of `p`.
pub fn first_within(points: &[Point], p: Point, radius: f32) -> Option<usize> {
    points.iter().position(|q| q.distance_to(&p) < radius)
}

/// Axis-aligned rectangle `[x1, x2) x [y1, y2)` in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    /// Bounds of `points` grown by `padding` on every side and clamped to
    /// `[0, canvas_width] x [0, canvas_height]`.
    ///
    /// Returns `None` for an empty point set.
    pub fn around(
        points: &[Point],
        padding: f32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let x1 = (min_x - padding).max(0.0);
        let y1 = (min_y - padding).max(0.0);
        let x2 = (max_x + padding).min(canvas_width as f32).max(x1);
        let y2 = (max_y + padding).min(canvas_height as f32).max(y1);

        Some(Self {
            x1: x1 as u32,
            y1: y1 as u32,
            x2: x2 as u32,
            y2: y2 as u32,
        })
    }

    /// Whole-canvas box.
    pub fn full(width: u32, height: u32) -> Self {
        Self { x1: 0, y1: 0, x2: width, y2: height }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Map from canvas to image pixels by independent per-axis factors.
    ///
    /// Each coordinate is truncated after scaling.
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            x1: (self.x1 as f32 * scale_x) as u32,
            y1: (self.y1 as f32 * scale_y) as u32,
            x2: (self.x2 as f32 * scale_x) as u32,
            y2: (self.y2 as f32 * scale_y) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_closed_length_includes_closing_segment() {
        assert!((closed_length(&square()) - 400.0).abs() < 1e-4);
        assert_eq!(closed_length(&[Point::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_contains() {
        let sq = square();
        assert!(contains(&sq, Point::new(50.0, 50.0)));
        assert!(contains(&sq, Point::new(0.5, 99.5)));
        assert!(!contains(&sq, Point::new(150.0, 50.0)));
        assert!(!contains(&sq, Point::new(-0.5, 50.0)));
        assert!(!contains(&sq[..2], Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_first_within() {
        let sq = square();
        assert_eq!(first_within(&sq, Point::new(98.0, 3.0), 20.0), Some(1));
        assert_eq!(first_within(&sq, Point::new(50.0, 50.0), 20.0), None);
    }

    #[test]
    fn test_bbox_padding_and_clamp() {
        let pts = vec![Point::new(5.0, 30.0), Point::new(60.0, 95.0)];
        let bbox = BoundingBox::around(&pts, 10.0, 100, 100).unwrap();
        assert_eq!(bbox, BoundingBox { x1: 0, y1: 20, x2: 70, y2: 100 });
        assert_eq!(bbox.width(), 70);
        assert_eq!(bbox.height(), 80);
        assert!(BoundingBox::around(&[], 10.0, 100, 100).is_none());
    }

    #[test]
    fn test_bbox_scaled() {
        let bbox = BoundingBox { x1: 10, y1: 20, x2: 50, y2: 60 };
        assert_eq!(bbox.scaled(2.0, 0.5), BoundingBox { x1: 20, y1: 10, x2: 100, y2: 30 });
    }
}
