//! Polygon masks and alpha compositing.
//!
//! - **raster**: scanline polygon fill at pixel centers
//! - **composite**: smoothing, feathering and alpha application to a cropped region

pub mod composite;
pub mod raster;

pub use composite::{composite, composite_with, cut_out, whole_image, MaskedImage};
