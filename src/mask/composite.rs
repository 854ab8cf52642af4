//! Mask compositing onto a cropped image region.
//!
//! Pipeline:
//! 1. Rasterize the contour (image space) into a binary mask
//! 2. Optional clean-up: blur by `smoothing_sigma`, hard threshold at the cutoff
//! 3. Optional feather: blur by `feather_radius`, re-threshold at the cutoff
//! 4. Write the mask as the alpha channel of an RGBA copy of the image
//! 5. Cut-outs only: downscale to `max_output_size` on the longest side

use log::debug;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::config::{EdgeMode, MaskOptions};
use crate::error::SelectionError;
use crate::filters::core::{blur_plane_u8, rethreshold};
use crate::filters::resize::{crop_u8, resize_bilinear_u8};
use crate::selection::geometry::{BoundingBox, Point};

use super::raster::rasterize_polygon;

/// Output artifact: RGBA pixels of the selected region plus the boxes that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage {
    /// RGBA pixels (height, width, 4); alpha is the selection mask.
    pub pixels: Array3<u8>,
    /// Selected region in canvas coordinates.
    pub screen_box: BoundingBox,
    /// Selected region in source-image coordinates.
    pub image_box: BoundingBox,
}

impl MaskedImage {
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn alpha(&self) -> ArrayView2<'_, u8> {
        self.pixels.index_axis(ndarray::Axis(2), 3)
    }
}

/// Build the alpha mask for `polygon` at `width x height`.
pub fn build_mask(
    polygon: &[Point],
    width: usize,
    height: usize,
    options: &MaskOptions,
) -> Result<Array2<u8>, SelectionError> {
    if polygon.len() < 3 {
        return Err(SelectionError::InsufficientPoints { required: 3, actual: polygon.len() });
    }

    let mut mask = rasterize_polygon(polygon, width, height);

    if options.smoothing_sigma > 0.0 {
        let blurred = blur_plane_u8(&mask, options.smoothing_sigma);
        mask = rethreshold(&blurred, options.cutoff, EdgeMode::Hard);
    }
    if options.feather_radius > 0.0 {
        let blurred = blur_plane_u8(&mask, options.feather_radius);
        mask = rethreshold(&blurred, options.cutoff, options.edge_mode);
    }

    Ok(mask)
}

/// RGBA copy of `image` with `mask` as its alpha channel.
///
/// Grayscale input is expanded to gray RGB; any existing alpha is replaced.
pub fn apply_alpha(image: ArrayView3<u8>, mask: &Array2<u8>) -> Array3<u8> {
    let (height, width, channels) = image.dim();
    Array3::from_shape_fn((height, width, 4), |(y, x, c)| match c {
        3 => mask.get([y, x]).copied().unwrap_or(0),
        _ if channels < 3 => image[[y, x, 0]],
        _ => image[[y, x, c]],
    })
}

/// Composite `contour` (image coordinates) as the alpha of `image`.
///
/// `feather` is the Gaussian sigma of the soft edge; 0 keeps the exact
/// polygon fill. The image is never modified.
pub fn composite(
    image: ArrayView3<u8>,
    contour: &[Point],
    feather: f32,
) -> Result<MaskedImage, SelectionError> {
    let options = MaskOptions {
        feather_radius: feather,
        smoothing_sigma: 0.0,
        ..MaskOptions::default()
    };
    composite_with(image, contour, &options)
}

/// [`composite`] with full control over smoothing, cutoff and edge mode.
///
/// The result always has the size of `image`; `max_output_size` is ignored.
pub fn composite_with(
    image: ArrayView3<u8>,
    contour: &[Point],
    options: &MaskOptions,
) -> Result<MaskedImage, SelectionError> {
    let (height, width, _) = image.dim();
    let mask = build_mask(contour, width, height, options)?;
    let full = BoundingBox::full(width as u32, height as u32);
    Ok(MaskedImage {
        pixels: apply_alpha(image, &mask),
        screen_box: full,
        image_box: full,
    })
}

/// Crop the region selected by a canvas-space contour out of `image` and mask it.
///
/// The contour's bounding box grows by `padding`, is clamped to the canvas and
/// must be at least `min_size` wide and tall. Box and contour are then mapped
/// to image coordinates by the per-axis ratio of image to canvas size.
///
/// A crop longer than `options.max_output_size` is downscaled to fit; the
/// reported `image_box` still names the source region.
///
/// # Errors
/// * `InsufficientPoints` - fewer than 3 contour points
/// * `OutOfRange` - selection smaller than `min_size`
/// * `DegenerateGeometry` - the region maps to an empty image area
pub fn cut_out(
    image: ArrayView3<u8>,
    contour: &[Point],
    canvas: (u32, u32),
    padding: f32,
    min_size: f32,
    options: &MaskOptions,
) -> Result<MaskedImage, SelectionError> {
    if contour.len() < 3 {
        return Err(SelectionError::InsufficientPoints { required: 3, actual: contour.len() });
    }
    let (canvas_width, canvas_height) = canvas;
    let screen_box = BoundingBox::around(contour, padding, canvas_width, canvas_height)
        .ok_or(SelectionError::InsufficientPoints { required: 3, actual: 0 })?;

    let smallest = screen_box.width().min(screen_box.height()) as f32;
    if smallest < min_size {
        return Err(SelectionError::OutOfRange {
            what: "selection size",
            value: smallest,
            min: min_size,
            max: canvas_width.max(canvas_height) as f32,
        });
    }

    let (img_height, img_width, _) = image.dim();
    let scale_x = img_width as f32 / canvas_width.max(1) as f32;
    let scale_y = img_height as f32 / canvas_height.max(1) as f32;
    let image_box = screen_box.scaled(scale_x, scale_y);
    if image_box.is_empty() {
        return Err(SelectionError::DegenerateGeometry("selection maps to an empty image region"));
    }

    let cropped = crop_u8(
        image,
        image_box.x1 as usize,
        image_box.y1 as usize,
        image_box.x2 as usize,
        image_box.y2 as usize,
    );
    let (crop_height, crop_width, _) = cropped.dim();

    let local: Vec<Point> = contour
        .iter()
        .map(|p| {
            Point::new(
                p.x * scale_x - image_box.x1 as f32,
                p.y * scale_y - image_box.y1 as f32,
            )
        })
        .collect();

    let mask = build_mask(&local, crop_width, crop_height, options)?;
    debug!(
        "cut out {}x{} region at ({}, {}) from {} contour points",
        crop_width,
        crop_height,
        image_box.x1,
        image_box.y1,
        contour.len()
    );

    Ok(MaskedImage {
        pixels: limit_size(apply_alpha(cropped.view(), &mask), options.max_output_size),
        screen_box,
        image_box,
    })
}

/// The whole image, fully opaque, as a selection result.
///
/// Downscaled like [`cut_out`] when it exceeds `options.max_output_size`.
pub fn whole_image(
    image: ArrayView3<u8>,
    canvas: (u32, u32),
    options: &MaskOptions,
) -> MaskedImage {
    let (height, width, _) = image.dim();
    let mask = Array2::<u8>::from_elem((height, width), 255);
    MaskedImage {
        pixels: limit_size(apply_alpha(image, &mask), options.max_output_size),
        screen_box: BoundingBox::full(canvas.0, canvas.1),
        image_box: BoundingBox::full(width as u32, height as u32),
    }
}

/// Bilinear downscale so the longest side is at most `max_size`, keeping the aspect ratio.
fn limit_size(pixels: Array3<u8>, max_size: Option<u32>) -> Array3<u8> {
    let (height, width, _) = pixels.dim();
    let Some(max_size) = max_size.map(|m| m.max(1) as usize) else {
        return pixels;
    };
    let longest = width.max(height);
    if longest <= max_size {
        return pixels;
    }

    let scale = max_size as f32 / longest as f32;
    let new_width = ((width as f32 * scale).round() as usize).clamp(1, max_size);
    let new_height = ((height as f32 * scale).round() as usize).clamp(1, max_size);
    debug!("downscaling {}x{} result to {}x{}", width, height, new_width, new_height);
    resize_bilinear_u8(pixels.view(), new_width, new_height)
}
