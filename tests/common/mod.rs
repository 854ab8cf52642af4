//! Synthetic images and contours shared by the integration tests.

#![allow(dead_code)]

use contourstag::selection::{InputEvent, Modifiers, Point, PointerButton};
use ndarray::Array3;

/// RGB image with a dark left half and a bright right half split at `edge_x`.
pub fn step_edge_image(width: usize, height: usize, edge_x: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(_, x, _)| if x < edge_x { 20 } else { 230 })
}

/// RGB image with a distinct color per pixel, so crops can be located.
pub fn gradient_image(width: usize, height: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| match c {
        0 => (x % 256) as u8,
        1 => (y % 256) as u8,
        _ => ((x + y) % 256) as u8,
    })
}

/// `samples` points on a circle, counter-clockwise in screen space.
pub fn circle(cx: f32, cy: f32, r: f32, samples: usize) -> Vec<Point> {
    (0..samples)
        .map(|i| {
            let a = i as f32 / samples as f32 * std::f32::consts::TAU;
            Point::new(cx + r * a.cos(), cy + r * a.sin())
        })
        .collect()
}

pub fn press(p: Point) -> InputEvent {
    press_with(p, Modifiers::default())
}

pub fn press_with(p: Point, modifiers: Modifiers) -> InputEvent {
    InputEvent::PointerDown {
        x: p.x,
        y: p.y,
        button: PointerButton::Primary,
        modifiers,
    }
}

pub fn right_click(p: Point) -> InputEvent {
    InputEvent::PointerDown {
        x: p.x,
        y: p.y,
        button: PointerButton::Secondary,
        modifiers: Modifiers::default(),
    }
}

pub fn move_to(p: Point) -> InputEvent {
    InputEvent::PointerMove { x: p.x, y: p.y }
}

pub fn release(p: Point) -> InputEvent {
    InputEvent::PointerUp { x: p.x, y: p.y }
}

/// Press, move through and release along `trace`.
pub fn stroke(trace: &[Point], modifiers: Modifiers) -> Vec<InputEvent> {
    let mut events = Vec::with_capacity(trace.len() + 1);
    if let Some((first, rest)) = trace.split_first() {
        events.push(press_with(*first, modifiers));
        events.extend(rest.iter().map(|&p| move_to(p)));
        events.push(release(*trace.last().unwrap_or(first)));
    }
    events
}
