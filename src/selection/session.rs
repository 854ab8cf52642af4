//! Editable control points for one selection.
//!
//! The session owns the working contour, the immutable trace it was created
//! from, and the undo stack of point moves. Operations that change the point
//! count replace the whole contour and clear the undo stack, since recorded
//! indices no longer refer to the same points.

use log::debug;

use crate::config::PointLimits;
use crate::error::SelectionError;

use super::capture::CaptureMode;
use super::geometry::Point;
use super::resample::resample_closed;

#[derive(Debug, Clone)]
pub struct EditSession {
    mode: CaptureMode,
    working: Vec<Point>,
    original: Option<Box<[Point]>>,
    undo: Vec<(usize, Point)>,
    limits: PointLimits,
}

impl EditSession {
    /// Session over a raw trace: the trace is kept as the original and the
    /// working contour is its resampling to `limits.initial_freehand_count`
    /// (clamped to the limits).
    pub fn from_trace(
        mode: CaptureMode,
        trace: Vec<Point>,
        limits: PointLimits,
    ) -> Result<Self, SelectionError> {
        let count = limits.initial_count();
        let working = resample_closed(&trace, count, &limits)?;
        debug!("session from {} trace samples -> {} control points", trace.len(), working.len());
        Ok(Self {
            mode,
            working,
            original: Some(trace.into_boxed_slice()),
            undo: Vec::new(),
            limits,
        })
    }

    /// Session whose control points are `points` themselves.
    ///
    /// With `keep_original` the points are also retained as the resampling source.
    pub fn from_points(
        mode: CaptureMode,
        points: Vec<Point>,
        keep_original: bool,
        limits: PointLimits,
    ) -> Result<Self, SelectionError> {
        if points.len() < 3 {
            return Err(SelectionError::InsufficientPoints { required: 3, actual: points.len() });
        }
        let original = keep_original.then(|| points.clone().into_boxed_slice());
        Ok(Self {
            mode,
            working: points,
            original,
            undo: Vec::new(),
            limits,
        })
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Current control points.
    pub fn points(&self) -> &[Point] {
        &self.working
    }

    /// The trace the session was created from, if kept.
    pub fn original(&self) -> Option<&[Point]> {
        self.original.as_deref()
    }

    pub fn count(&self) -> usize {
        self.working.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Record the position of point `index` before a drag starts.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        match self.working.get(index) {
            Some(&p) => {
                self.undo.push((index, p));
                true
            }
            None => false,
        }
    }

    /// Move point `index` to `p`. Does not touch the undo stack.
    pub fn move_point(&mut self, index: usize, p: Point) -> bool {
        match self.working.get_mut(index) {
            Some(slot) => {
                *slot = p;
                true
            }
            None => false,
        }
    }

    /// Restore the most recently recorded point position.
    pub fn undo(&mut self) -> Option<(usize, Point)> {
        let (index, p) = self.undo.pop()?;
        if self.move_point(index, p) {
            debug!("undo point {} to ({:.1}, {:.1})", index, p.x, p.y);
        }
        Some((index, p))
    }

    /// Contour to resample from: the original when it has at least 4 points,
    /// else the working contour when it does.
    fn resample_source(&self) -> Result<&[Point], SelectionError> {
        match self.original.as_deref() {
            Some(original) if original.len() >= 4 => Ok(original),
            _ if self.working.len() >= 4 => Ok(self.working.as_slice()),
            _ => Err(SelectionError::InsufficientPoints {
                required: 4,
                actual: self.original.as_deref().map_or(0, <[Point]>::len).max(self.working.len()),
            }),
        }
    }

    /// Replace the working contour by a resampling to `count` points.
    ///
    /// Returns `Ok(false)` without touching anything when `count` equals the
    /// current count.
    pub fn resample_to(&mut self, count: usize) -> Result<bool, SelectionError> {
        if count == self.working.len() {
            return Ok(false);
        }
        let source = self.resample_source()?;
        let source_len = source.len();
        let resampled = resample_closed(source, count, &self.limits)?;

        debug!(
            "resampled {} -> {} points (source has {})",
            self.working.len(),
            resampled.len(),
            source_len
        );
        self.working = resampled;
        self.undo.clear();
        Ok(true)
    }

    /// One "more points" step. `Ok(false)` when already at the maximum.
    pub fn increase(&mut self) -> Result<bool, SelectionError> {
        match self.limits.step_up(self.working.len()) {
            Some(next) => self.resample_to(next),
            None => {
                debug!("already at max points ({})", self.working.len());
                Ok(false)
            }
        }
    }

    /// One "fewer points" step. `Ok(false)` when already at the minimum.
    pub fn decrease(&mut self) -> Result<bool, SelectionError> {
        match self.limits.step_down(self.working.len()) {
            Some(next) => self.resample_to(next),
            None => {
                debug!("already at min points ({})", self.working.len());
                Ok(false)
            }
        }
    }

    pub fn into_points(self) -> Vec<Point> {
        self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(n: usize, r: f32) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                Point::new(100.0 + r * a.cos(), 100.0 + r * a.sin())
            })
            .collect()
    }

    fn dots() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    fn traced(trace: Vec<Point>) -> EditSession {
        EditSession::from_trace(CaptureMode::Freehand, trace, PointLimits::default()).unwrap()
    }

    fn dotted(points: Vec<Point>) -> EditSession {
        EditSession::from_points(CaptureMode::Dots, points, true, PointLimits::default()).unwrap()
    }

    #[test]
    fn test_from_trace_resamples_to_initial_count() {
        let session = traced(circle(150, 50.0));
        assert_eq!(session.count(), 24);
        assert_eq!(session.original().unwrap().len(), 150);
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_inverted_limits_are_an_error() {
        let limits = PointLimits { min_count: 50, max_count: 20, ..PointLimits::default() };
        let result = EditSession::from_trace(CaptureMode::Freehand, circle(60, 50.0), limits);
        assert!(matches!(result, Err(SelectionError::OutOfRange { .. })));
    }

    #[test]
    fn test_zero_count_limits_never_yield_empty_session() {
        let limits = PointLimits {
            min_count: 0,
            initial_freehand_count: 0,
            ..PointLimits::default()
        };
        let result = EditSession::from_trace(CaptureMode::Freehand, circle(60, 50.0), limits);
        assert!(matches!(result, Err(SelectionError::OutOfRange { .. })));
    }

    #[test]
    fn test_drag_then_undo_restores_exact_position() {
        let mut session = dotted(dots());
        assert!(session.begin_drag(2));
        session.move_point(2, Point::new(120.0, 130.0));
        session.move_point(2, Point::new(140.0, 150.0));
        assert_eq!(session.undo_depth(), 1);

        assert_eq!(session.undo(), Some((2, Point::new(100.0, 100.0))));
        assert_eq!(session.points()[2], Point::new(100.0, 100.0));
        assert_eq!(session.undo_depth(), 0);
        assert_eq!(session.undo(), None);
    }

    #[test]
    fn test_begin_drag_out_of_bounds() {
        let mut session = dotted(dots());
        assert!(!session.begin_drag(9));
        assert!(!session.move_point(9, Point::new(0.0, 0.0)));
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_resample_clears_undo() {
        let mut session = dotted(dots());
        session.begin_drag(0);
        session.move_point(0, Point::new(5.0, 5.0));
        assert_eq!(session.increase(), Ok(true));
        assert_eq!(session.count(), 9);
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn test_resample_same_count_is_noop() {
        let mut session = traced(circle(100, 40.0));
        assert_eq!(session.resample_to(30), Ok(true));
        session.begin_drag(1);
        let before = session.points().to_vec();
        assert_eq!(session.resample_to(30), Ok(false));
        assert_eq!(session.points(), &before[..]);
        assert_eq!(session.undo_depth(), 1);
    }

    #[test]
    fn test_resample_always_uses_original() {
        let mut session = traced(circle(200, 60.0));
        session.resample_to(8).unwrap();
        session.resample_to(100).unwrap();
        // Resampled from the 200-point circle, not the octagon: every point stays on the circle.
        for p in session.points() {
            let r = p.distance_to(&Point::new(100.0, 100.0));
            assert!((r - 60.0).abs() < 0.5, "radius {r}");
        }
    }

    #[test]
    fn test_step_bounds_are_noops() {
        let mut session = traced(circle(300, 80.0));
        session.resample_to(200).unwrap();
        assert_eq!(session.increase(), Ok(false));
        assert_eq!(session.count(), 200);

        session.resample_to(8).unwrap();
        assert_eq!(session.decrease(), Ok(false));
        assert_eq!(session.count(), 8);
        assert_eq!(session.increase(), Ok(true));
        assert_eq!(session.count(), 13);
    }

    #[test]
    fn test_three_dots_cannot_resample() {
        let three = dots()[..3].to_vec();
        let mut session = dotted(three);
        assert_eq!(
            session.increase(),
            Err(SelectionError::InsufficientPoints { required: 4, actual: 3 })
        );
        assert_eq!(session.count(), 3);
    }

    #[test]
    fn test_out_of_range_count_rejected() {
        let mut session = dotted(dots());
        assert!(matches!(session.resample_to(500), Err(SelectionError::OutOfRange { .. })));
        assert_eq!(session.count(), 4);
    }

    #[test]
    fn test_from_points_needs_three() {
        let two = dots()[..2].to_vec();
        let limits = PointLimits::default();
        assert!(EditSession::from_points(CaptureMode::Dots, two, true, limits).is_err());
    }
}
