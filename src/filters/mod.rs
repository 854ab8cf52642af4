//! Image-processing building blocks used by edge snapping and mask output.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! Single-channel planes (masks, edge fields) are `Array2<u8>` of shape (H, W).
//! Convolutions run row-parallel with rayon.

pub mod core;
pub mod edge;
pub mod resize;
