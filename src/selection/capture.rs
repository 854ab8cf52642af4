//! Pointer-sample accumulation for each capture mode.
//!
//! One `PointCapture` serves every mode; the mode decides how presses,
//! motion and releases turn into points:
//! - **Freehand**: every motion sample while the button is held
//! - **Dots**: one point per click, last point removable
//! - **Rectangle / Ellipse**: anchor and current corner of a drag box

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

use super::geometry::Point;

/// How pointer input becomes a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Freehand,
    Dots,
    Rectangle,
    Ellipse,
}

impl CaptureMode {
    /// Shape modes are driven by a drag box rather than a point trail.
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Ellipse)
    }
}

/// Result of a finished capture.
#[derive(Debug, Clone, PartialEq)]
pub enum Captured {
    /// Raw freehand samples.
    Trace(Vec<Point>),
    /// Clicked dots, in click order.
    Dots(Vec<Point>),
    /// Opposite corners of a drag box.
    Box { from: Point, to: Point },
}

#[derive(Debug, Clone)]
pub struct PointCapture {
    mode: CaptureMode,
    points: Vec<Point>,
    anchor: Option<Point>,
    corner: Option<Point>,
    drawing: bool,
}

impl PointCapture {
    pub fn new(mode: CaptureMode) -> Self {
        Self {
            mode,
            points: Vec::new(),
            anchor: None,
            corner: None,
            drawing: false,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Points collected so far (freehand samples or dots).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current drag box as (anchor, corner), for shape modes.
    pub fn drag_box(&self) -> Option<(Point, Point)> {
        self.anchor.zip(self.corner)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Nothing has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.anchor.is_none()
    }

    /// Primary button pressed at `p`.
    pub fn press(&mut self, p: Point) {
        match self.mode {
            CaptureMode::Freehand => {
                self.points.clear();
                self.points.push(p);
                self.drawing = true;
            }
            CaptureMode::Dots => {
                self.points.push(p);
                trace!("dot {} at ({:.0}, {:.0})", self.points.len(), p.x, p.y);
            }
            CaptureMode::Rectangle | CaptureMode::Ellipse => {
                self.anchor = Some(p);
                self.corner = Some(p);
                self.drawing = true;
            }
        }
    }

    /// Pointer moved to `p`.
    pub fn motion(&mut self, p: Point) {
        if !self.drawing {
            return;
        }
        match self.mode {
            CaptureMode::Freehand => self.points.push(p),
            CaptureMode::Rectangle | CaptureMode::Ellipse => self.corner = Some(p),
            CaptureMode::Dots => {}
        }
    }

    /// Primary button released at `p`.
    ///
    /// Returns the finished capture for freehand strokes with more than
    /// `min_samples` samples and for shape drags. A short freehand stroke is
    /// discarded.
    pub fn release(&mut self, p: Point, min_samples: usize) -> Option<Captured> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;

        match self.mode {
            CaptureMode::Freehand => {
                if self.points.len() > min_samples {
                    Some(Captured::Trace(std::mem::take(&mut self.points)))
                } else {
                    trace!("freehand stroke of {} samples discarded", self.points.len());
                    self.points.clear();
                    None
                }
            }
            CaptureMode::Rectangle | CaptureMode::Ellipse => {
                let from = self.anchor.take()?;
                self.corner = None;
                Some(Captured::Box { from, to: p })
            }
            CaptureMode::Dots => None,
        }
    }

    /// Remove the most recent dot.
    pub fn remove_last(&mut self) -> Option<Point> {
        if self.mode != CaptureMode::Dots {
            return None;
        }
        self.points.pop()
    }

    /// Finish dot capture.
    ///
    /// # Errors
    /// `InsufficientPoints` when fewer than `min_points` dots were placed; the
    /// dots are kept so the user can add more.
    pub fn finish_dots(&mut self, min_points: usize) -> Result<Captured, SelectionError> {
        if self.points.len() < min_points {
            return Err(SelectionError::InsufficientPoints {
                required: min_points,
                actual: self.points.len(),
            });
        }
        Ok(Captured::Dots(std::mem::take(&mut self.points)))
    }
}

/// Corners of the axis-aligned box spanned by `a` and `b`, clockwise from top-left.
///
/// # Errors
/// `DegenerateGeometry` when the box has zero width or height.
pub fn rectangle_corners(a: Point, b: Point) -> Result<Vec<Point>, SelectionError> {
    let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
    let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));
    if x2 - x1 <= 0.0 || y2 - y1 <= 0.0 {
        return Err(SelectionError::DegenerateGeometry("drag box has zero area"));
    }
    Ok(vec![
        Point::new(x1, y1),
        Point::new(x2, y1),
        Point::new(x2, y2),
        Point::new(x1, y2),
    ])
}

/// Polygon of `vertices` points on the ellipse inscribed in the box spanned by `a` and `b`.
///
/// # Errors
/// `DegenerateGeometry` when the box has zero width or height.
pub fn ellipse_polygon(a: Point, b: Point, vertices: usize) -> Result<Vec<Point>, SelectionError> {
    if vertices < 3 {
        return Err(SelectionError::InsufficientPoints { required: 3, actual: vertices });
    }
    let corners = rectangle_corners(a, b)?;
    let (tl, br) = (corners[0], corners[2]);
    let cx = (tl.x + br.x) * 0.5;
    let cy = (tl.y + br.y) * 0.5;
    let rx = (br.x - tl.x) * 0.5;
    let ry = (br.y - tl.y) * 0.5;

    Ok((0..vertices)
        .map(|i| {
            let theta = i as f32 / vertices as f32 * std::f32::consts::TAU;
            Point::new(cx + rx * theta.cos(), cy + ry * theta.sin())
        })
        .collect())
}
