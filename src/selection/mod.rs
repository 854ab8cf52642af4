//! Interactive contour selection.
//!
//! This module turns pointer input into an editable closed contour:
//! - **capture**: freehand strokes, dot clicks and rectangle/ellipse drags
//! - **resample**: equal arc-length redistribution of control points
//! - **spline**: closed Catmull-Rom densification for the final polygon
//! - **edge_snap**: nearest strong image edge under a placed point
//! - **session**: working contour, original trace and undo stack
//! - **editor**: the event-driven state machine tying them together
//!
//! Committing a selection hands the dense contour to [`crate::mask`].

pub mod capture;
pub mod edge_snap;
pub mod editor;
pub mod geometry;
pub mod resample;
pub mod session;
pub mod spline;

pub use capture::{CaptureMode, Captured, PointCapture};
pub use edge_snap::EdgeField;
pub use editor::{ContourEditor, EditorState, InputEvent, Key, Modifiers, PointerButton, Response};
pub use geometry::{BoundingBox, Point};
pub use resample::resample_closed;
pub use session::EditSession;
pub use spline::interpolate_closed;
