//! Event-driven contour editor.
//!
//! A `ContourEditor` owns the reference image, the capture or edit session in
//! progress and the lazily built edge field. Every pointer and key event goes
//! through [`ContourEditor::handle`], which answers with a [`Response`].
//!
//! States:
//! ```text
//! Capturing(mode) --finish--> Editing --Enter--> Committed
//!        |                       |
//!        +-------Escape----------+-------------> Cancelled
//! ```
//! Rejected operations leave the state untouched.

use log::debug;
use ndarray::Array3;

use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::mask::{cut_out, whole_image, MaskedImage};

use super::capture::{ellipse_polygon, rectangle_corners, CaptureMode, Captured, PointCapture};
use super::edge_snap::EdgeField;
use super::geometry::{first_within, Point};
use super::session::EditSession;
use super::spline::interpolate_closed;

/// Externally visible editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Capturing(CaptureMode),
    Editing,
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Modifier keys held at pointer-down.
///
/// Ctrl starts a rectangle drag (an ellipse with Shift) from freehand or dot
/// capture. Alt snaps placed points to nearby edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Up,
    Down,
}

/// Input delivered to the editor, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    KeyPress(Key),
}

/// Outcome of one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Nothing changed.
    Ignored,
    /// Points, hover or state changed; redraw.
    Updated,
    /// The request was invalid; state is unchanged.
    Rejected(SelectionError),
    /// Selection finished; the editor is now terminal.
    Committed(MaskedImage),
    /// Selection abandoned; the editor is now terminal.
    Cancelled,
}

enum Phase {
    Capturing(PointCapture),
    Editing(EditSession),
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Drag { index: usize, snap: bool },
    Swipe { last_y: f32, accumulated: f32 },
}

pub struct ContourEditor {
    image: Array3<u8>,
    canvas: (u32, u32),
    config: SelectionConfig,
    mode: CaptureMode,
    phase: Phase,
    edges: Option<EdgeField>,
    snap_active: bool,
    gesture: Option<Gesture>,
    hover: Option<usize>,
}

impl ContourEditor {
    /// Editor over `image` shown on a `canvas_width x canvas_height` canvas,
    /// starting in freehand capture.
    ///
    /// # Errors
    /// Whatever [`SelectionConfig::validate`] reports for `config`.
    pub fn new(
        image: Array3<u8>,
        canvas_width: u32,
        canvas_height: u32,
        config: SelectionConfig,
    ) -> Result<Self, SelectionError> {
        config.validate()?;
        Ok(Self {
            image,
            canvas: (canvas_width, canvas_height),
            config,
            mode: CaptureMode::Freehand,
            phase: Phase::Capturing(PointCapture::new(CaptureMode::Freehand)),
            edges: None,
            snap_active: false,
            gesture: None,
            hover: None,
        })
    }

    pub fn state(&self) -> EditorState {
        match &self.phase {
            Phase::Capturing(capture) => EditorState::Capturing(capture.mode()),
            Phase::Editing(_) => EditorState::Editing,
            Phase::Committed => EditorState::Committed,
            Phase::Cancelled => EditorState::Cancelled,
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn capture(&self) -> Option<&PointCapture> {
        match &self.phase {
            Phase::Capturing(capture) => Some(capture),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.phase {
            Phase::Editing(session) => Some(session),
            _ => None,
        }
    }

    /// Control point under the pointer while editing.
    pub fn hovered(&self) -> Option<usize> {
        self.hover
    }

    /// The edge field, once snapping has needed it.
    pub fn edge_field(&self) -> Option<&EdgeField> {
        self.edges.as_ref()
    }

    /// Contour to draw for the current state: raw samples or dots while
    /// capturing, the spline through the control points while editing.
    pub fn preview(&self) -> Vec<Point> {
        match &self.phase {
            Phase::Capturing(capture) => match capture.drag_box() {
                Some((a, b)) if capture.mode() == CaptureMode::Ellipse => {
                    ellipse_polygon(a, b, self.config.capture.ellipse_vertices).unwrap_or_default()
                }
                Some((a, b)) => rectangle_corners(a, b).unwrap_or_default(),
                None => capture.points().to_vec(),
            },
            Phase::Editing(session) => self.dense_contour(session),
            Phase::Committed | Phase::Cancelled => Vec::new(),
        }
    }

    /// Switch capture mode. Only allowed before anything has been captured.
    pub fn select_mode(&mut self, mode: CaptureMode) -> bool {
        match &mut self.phase {
            Phase::Capturing(capture) if capture.is_empty() && !capture.is_drawing() => {
                *capture = PointCapture::new(mode);
                self.mode = mode;
                debug!("capture mode set to {:?}", mode);
                true
            }
            _ => false,
        }
    }

    /// Feed one input event through the state machine.
    pub fn handle(&mut self, event: InputEvent) -> Response {
        if matches!(self.phase, Phase::Committed | Phase::Cancelled) {
            return Response::Ignored;
        }

        match event {
            InputEvent::KeyPress(Key::Escape) => self.cancel(),
            InputEvent::KeyPress(key) => self.key_press(key),
            InputEvent::PointerDown { x, y, button, modifiers } => {
                self.pointer_down(Point::new(x, y), button, modifiers)
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(Point::new(x, y)),
        }
    }

    fn pointer_down(&mut self, p: Point, button: PointerButton, modifiers: Modifiers) -> Response {
        let snap = modifiers.alt || self.config.capture.snap_by_default;

        match &mut self.phase {
            Phase::Capturing(capture) => {
                if button == PointerButton::Secondary {
                    return match capture.remove_last() {
                        Some(_) => Response::Updated,
                        None => Response::Ignored,
                    };
                }
                if modifiers.ctrl && capture.is_empty() && !capture.mode().is_shape() {
                    let shape = if modifiers.shift {
                        CaptureMode::Ellipse
                    } else {
                        CaptureMode::Rectangle
                    };
                    *capture = PointCapture::new(shape);
                }
                let is_shape = capture.mode().is_shape();

                self.snap_active = snap && !is_shape;
                let p = if self.snap_active { self.snapped(p) } else { p };
                if let Phase::Capturing(capture) = &mut self.phase {
                    capture.press(p);
                }
                Response::Updated
            }
            Phase::Editing(session) => {
                if button == PointerButton::Secondary {
                    return Response::Ignored;
                }
                match first_within(session.points(), p, self.config.capture.grab_radius) {
                    Some(index) => {
                        session.begin_drag(index);
                        debug!("grabbed point {}", index);
                        self.gesture = Some(Gesture::Drag { index, snap });
                    }
                    None => {
                        self.gesture = Some(Gesture::Swipe { last_y: p.y, accumulated: 0.0 });
                    }
                }
                Response::Updated
            }
            Phase::Committed | Phase::Cancelled => Response::Ignored,
        }
    }

    fn pointer_move(&mut self, p: Point) -> Response {
        match self.gesture {
            Some(Gesture::Drag { index, snap }) => {
                let target = if snap { self.snapped(p) } else { p };
                let moved = match &mut self.phase {
                    Phase::Editing(session) => session.move_point(index, target),
                    _ => false,
                };
                if moved {
                    Response::Updated
                } else {
                    Response::Ignored
                }
            }
            Some(Gesture::Swipe { last_y, accumulated }) => {
                // Screen y grows downwards; an upward swipe accumulates positive motion.
                let accumulated = accumulated + (last_y - p.y);
                if accumulated.abs() < self.config.capture.swipe_threshold {
                    self.gesture = Some(Gesture::Swipe { last_y: p.y, accumulated });
                    return Response::Ignored;
                }
                self.gesture = Some(Gesture::Swipe { last_y: p.y, accumulated: 0.0 });
                let result = match &mut self.phase {
                    Phase::Editing(session) if accumulated > 0.0 => session.increase(),
                    Phase::Editing(session) => session.decrease(),
                    _ => return Response::Ignored,
                };
                self.after_resample(result)
            }
            None => self.track_pointer(p),
        }
    }

    /// Pointer motion without a gesture: freehand samples, shape corners or hover.
    fn track_pointer(&mut self, p: Point) -> Response {
        match &mut self.phase {
            Phase::Capturing(capture) => {
                if !capture.is_drawing() {
                    return Response::Ignored;
                }
                let snap = self.snap_active && capture.mode() == CaptureMode::Freehand;
                let p = if snap { self.snapped(p) } else { p };
                if let Phase::Capturing(capture) = &mut self.phase {
                    capture.motion(p);
                }
                Response::Updated
            }
            Phase::Editing(session) => {
                let hover = first_within(session.points(), p, self.config.capture.hover_radius);
                if hover == self.hover {
                    return Response::Ignored;
                }
                self.hover = hover;
                Response::Updated
            }
            Phase::Committed | Phase::Cancelled => Response::Ignored,
        }
    }

    fn pointer_up(&mut self, p: Point) -> Response {
        let gesture = self.gesture.take();
        self.snap_active = false;

        match &mut self.phase {
            Phase::Capturing(capture) => {
                let was_drawing = capture.is_drawing();
                let mode = capture.mode();
                match capture.release(p, self.config.capture.freehand_min_samples) {
                    Some(captured) => self.begin_editing(mode, captured),
                    None if was_drawing => Response::Updated,
                    None => Response::Ignored,
                }
            }
            Phase::Editing(_) if gesture.is_some() => Response::Updated,
            _ => Response::Ignored,
        }
    }

    fn key_press(&mut self, key: Key) -> Response {
        match &mut self.phase {
            Phase::Capturing(capture) => match key {
                Key::Enter if capture.is_empty() => self.commit_whole_image(),
                Key::Enter if capture.mode() == CaptureMode::Dots => {
                    match capture.finish_dots(self.config.capture.dots_min_points) {
                        Ok(captured) => self.begin_editing(CaptureMode::Dots, captured),
                        Err(err) => self.reject(err),
                    }
                }
                Key::Backspace => match capture.remove_last() {
                    Some(_) => Response::Updated,
                    None => Response::Ignored,
                },
                _ => Response::Ignored,
            },
            Phase::Editing(session) => match key {
                Key::Enter => self.commit(),
                Key::Backspace => match session.undo() {
                    Some(_) => Response::Updated,
                    None => Response::Ignored,
                },
                Key::Up => {
                    let result = session.increase();
                    self.after_resample(result)
                }
                Key::Down => {
                    let result = session.decrease();
                    self.after_resample(result)
                }
                Key::Escape => Response::Ignored,
            },
            Phase::Committed | Phase::Cancelled => Response::Ignored,
        }
    }

    fn begin_editing(&mut self, mode: CaptureMode, captured: Captured) -> Response {
        let limits = self.config.points;
        let session = match captured {
            Captured::Trace(trace) => EditSession::from_trace(mode, trace, limits),
            Captured::Dots(dots) => EditSession::from_points(mode, dots, true, limits),
            Captured::Box { from, to } if mode == CaptureMode::Ellipse => {
                ellipse_polygon(from, to, self.config.capture.ellipse_vertices)
                    .and_then(|polygon| EditSession::from_points(mode, polygon, true, limits))
            }
            Captured::Box { from, to } => rectangle_corners(from, to).and_then(|corners| {
                EditSession::from_points(CaptureMode::Rectangle, corners, false, limits)
            }),
        };

        match session {
            Ok(session) => {
                debug!("capturing -> editing ({:?}, {} control points)", mode, session.count());
                self.phase = Phase::Editing(session);
                self.hover = None;
                Response::Updated
            }
            Err(err) => {
                self.phase = Phase::Capturing(PointCapture::new(self.mode));
                self.reject(err)
            }
        }
    }

    fn after_resample(&mut self, result: Result<bool, SelectionError>) -> Response {
        match result {
            Ok(true) => {
                self.hover = None;
                if matches!(self.gesture, Some(Gesture::Drag { .. })) {
                    self.gesture = None;
                }
                Response::Updated
            }
            Ok(false) => Response::Ignored,
            Err(err) => self.reject(err),
        }
    }

    /// Polygon handed to the compositor: rectangles as-is, everything else splined.
    fn dense_contour(&self, session: &EditSession) -> Vec<Point> {
        match session.mode() {
            CaptureMode::Rectangle => session.points().to_vec(),
            _ => interpolate_closed(session.points(), self.config.points.spline_samples),
        }
    }

    fn commit(&mut self) -> Response {
        let (contour, padding) = match &self.phase {
            Phase::Editing(session) => {
                let padding = if session.mode().is_shape() {
                    self.config.capture.shape_padding
                } else {
                    self.config.capture.freeform_padding
                };
                (self.dense_contour(session), padding)
            }
            _ => return Response::Ignored,
        };

        match cut_out(
            self.image.view(),
            &contour,
            self.canvas,
            padding,
            self.config.capture.min_selection_size,
            &self.config.mask,
        ) {
            Ok(masked) => {
                debug!(
                    "editing -> committed ({}x{} from {} contour points)",
                    masked.width(),
                    masked.height(),
                    contour.len()
                );
                self.finish(Phase::Committed);
                Response::Committed(masked)
            }
            Err(err) => self.reject(err),
        }
    }

    fn commit_whole_image(&mut self) -> Response {
        let masked = whole_image(self.image.view(), self.canvas, &self.config.mask);
        debug!("no selection, committing whole {}x{} image", masked.width(), masked.height());
        self.finish(Phase::Committed);
        Response::Committed(masked)
    }

    fn cancel(&mut self) -> Response {
        debug!("selection cancelled in {:?}", self.state());
        self.finish(Phase::Cancelled);
        Response::Cancelled
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.gesture = None;
        self.hover = None;
        self.snap_active = false;
    }

    fn reject(&self, err: SelectionError) -> Response {
        debug!("rejected in {:?}: {}", self.state(), err);
        Response::Rejected(err)
    }

    fn snapped(&mut self, p: Point) -> Point {
        let (width, height) = (self.canvas.0 as usize, self.canvas.1 as usize);
        let options = self.config.snap;
        let image = &self.image;
        let field = self
            .edges
            .get_or_insert_with(|| EdgeField::build(image.view(), width, height, &options));
        field.snap(p, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> ContourEditor {
        let image =
            Array3::from_shape_fn((200, 200, 3), |(y, x, c)| ((x + y + c * 40) % 256) as u8);
        ContourEditor::new(image, 200, 200, SelectionConfig::default()).unwrap()
    }

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    fn circle_stroke(editor: &mut ContourEditor, samples: usize) -> Response {
        let at = |i: usize| {
            let a = i as f32 / samples as f32 * std::f32::consts::TAU;
            (100.0 + 50.0 * a.cos(), 100.0 + 50.0 * a.sin())
        };
        let (x, y) = at(0);
        editor.handle(down(x, y));
        for i in 1..samples {
            let (x, y) = at(i);
            editor.handle(InputEvent::PointerMove { x, y });
        }
        let (x, y) = at(samples - 1);
        editor.handle(InputEvent::PointerUp { x, y })
    }

    #[test]
    fn test_freehand_to_editing() {
        let mut editor = editor();
        assert_eq!(editor.state(), EditorState::Capturing(CaptureMode::Freehand));
        assert_eq!(circle_stroke(&mut editor, 60), Response::Updated);
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.session().unwrap().count(), 24);
        assert_eq!(editor.preview().len(), 240);
    }

    #[test]
    fn test_short_stroke_stays_capturing() {
        let mut editor = editor();
        assert_eq!(circle_stroke(&mut editor, 8), Response::Updated);
        assert_eq!(editor.state(), EditorState::Capturing(CaptureMode::Freehand));
        assert!(editor.capture().unwrap().is_empty());
    }

    #[test]
    fn test_select_mode_only_before_capture() {
        let mut editor = editor();
        assert!(editor.select_mode(CaptureMode::Dots));
        editor.handle(down(10.0, 10.0));
        assert!(!editor.select_mode(CaptureMode::Freehand));
        assert_eq!(editor.state(), EditorState::Capturing(CaptureMode::Dots));
    }

    #[test]
    fn test_keys_resample_and_swipe() {
        let mut editor = editor();
        circle_stroke(&mut editor, 60);
        assert_eq!(editor.handle(InputEvent::KeyPress(Key::Up)), Response::Updated);
        assert_eq!(editor.session().unwrap().count(), 29);
        assert_eq!(editor.handle(InputEvent::KeyPress(Key::Down)), Response::Updated);
        assert_eq!(editor.session().unwrap().count(), 24);

        // Press at the center is far from every control point: a swipe.
        editor.handle(down(100.0, 100.0));
        assert_eq!(editor.handle(InputEvent::PointerMove { x: 100.0, y: 60.0 }), Response::Ignored);
        assert_eq!(editor.handle(InputEvent::PointerMove { x: 100.0, y: 15.0 }), Response::Updated);
        assert_eq!(editor.session().unwrap().count(), 29);
        editor.handle(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        assert_eq!(editor.session().unwrap().count(), 24);
        editor.handle(InputEvent::PointerUp { x: 100.0, y: 100.0 });
    }

    #[test]
    fn test_hover_tracks_nearby_point() {
        let mut editor = editor();
        circle_stroke(&mut editor, 60);
        let p0 = editor.session().unwrap().points()[0];
        let nearby = InputEvent::PointerMove { x: p0.x + 3.0, y: p0.y };
        assert_eq!(editor.handle(nearby), Response::Updated);
        assert_eq!(editor.hovered(), Some(0));
        editor.handle(InputEvent::PointerMove { x: 100.0, y: 100.0 });
        assert_eq!(editor.hovered(), None);
    }

    #[test]
    fn test_escape_is_terminal() {
        let mut editor = editor();
        circle_stroke(&mut editor, 60);
        assert_eq!(editor.handle(InputEvent::KeyPress(Key::Escape)), Response::Cancelled);
        assert_eq!(editor.state(), EditorState::Cancelled);
        assert!(editor.session().is_none());
        assert_eq!(editor.handle(InputEvent::KeyPress(Key::Enter)), Response::Ignored);
        assert_eq!(editor.handle(down(5.0, 5.0)), Response::Ignored);
    }

    #[test]
    fn test_rejected_commit_keeps_editing() {
        let mut editor = editor();
        editor.select_mode(CaptureMode::Rectangle);
        editor.handle(down(100.0, 100.0));
        editor.handle(InputEvent::PointerUp { x: 105.0, y: 105.0 });
        assert_eq!(editor.state(), EditorState::Editing);

        // 5px box + 2 * 5px padding is below the 20px minimum.
        let response = editor.handle(InputEvent::KeyPress(Key::Enter));
        assert!(matches!(response, Response::Rejected(SelectionError::OutOfRange { .. })));
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.session().unwrap().count(), 4);
    }

    #[test]
    fn test_degenerate_drag_returns_to_capture() {
        let mut editor = editor();
        editor.select_mode(CaptureMode::Ellipse);
        editor.handle(down(50.0, 50.0));
        let response = editor.handle(InputEvent::PointerUp { x: 50.0, y: 90.0 });
        assert!(matches!(response, Response::Rejected(SelectionError::DegenerateGeometry(_))));
        assert_eq!(editor.state(), EditorState::Capturing(CaptureMode::Ellipse));
        assert!(editor.capture().unwrap().is_empty());
    }
}
