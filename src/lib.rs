//! ContourStag
//!
//! Interactive region selection over a reference image: capture a rough
//! outline, edit its control points, and cut the selected region out as an
//! RGBA image whose alpha channel is the selection mask.
//!
//! ## Image Format
//! Images are `ndarray` buffers in `(height, width, channels)` layout:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Output is always RGBA u8. Masks and edge fields are `(height, width)` u8 planes.
//!
//! ## Coordinates
//! Pointer input and contours live in canvas space (the on-screen size of the
//! image). Committing a selection maps the contour into image space by the
//! per-axis ratio of image size to canvas size.
//!
//! ## Layout
//! - [`selection`]: capture, resampling, splines, edge snapping and the editor
//! - [`mask`]: polygon rasterization and alpha compositing
//! - [`filters`]: blur, gradient and resize primitives shared by both

pub mod config;
pub mod error;
pub mod filters;
pub mod mask;
pub mod selection;

pub use config::SelectionConfig;
pub use error::SelectionError;

#[cfg(feature = "wasm")]
pub mod wasm;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::{MaskOptions, PointLimits, SnapOptions};
    use crate::error::SelectionError;
    use crate::mask::{composite, cut_out};
    use crate::selection::edge_snap::EdgeField;
    use crate::selection::geometry::Point;
    use crate::selection::resample::resample_closed;
    use crate::selection::spline::interpolate_closed;

    fn to_points(points: &[(f32, f32)]) -> Vec<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn to_tuples(points: &[Point]) -> Vec<(f32, f32)> {
        points.iter().map(|&p| p.into()).collect()
    }

    fn py_err(err: SelectionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Contour Geometry
    // ========================================================================

    /// Resample a closed contour to `count` points equally spaced by arc length.
    ///
    /// Raises ValueError for fewer than 4 input points or `count` outside [8, 200].
    #[pyfunction]
    pub fn resample_contour(points: Vec<(f32, f32)>, count: usize) -> PyResult<Vec<(f32, f32)>> {
        let resampled =
            resample_closed(&to_points(&points), count, &PointLimits::default()).map_err(py_err)?;
        Ok(to_tuples(&resampled))
    }

    /// Densify control points with a closed Catmull-Rom spline.
    #[pyfunction]
    #[pyo3(signature = (points, samples=10))]
    pub fn interpolate_contour(points: Vec<(f32, f32)>, samples: usize) -> Vec<(f32, f32)> {
        to_tuples(&interpolate_closed(&to_points(&points), samples))
    }

    // ========================================================================
    // Edge Snapping
    // ========================================================================

    /// Snap `(x, y)` to the nearest strong edge of `image` within `radius` pixels.
    ///
    /// The image is used at its own resolution.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, radius=12, threshold=40, max_distance=10.0))]
    pub fn snap_to_edge<'py>(
        image: PyReadonlyArray3<'py, u8>,
        x: f32,
        y: f32,
        radius: u32,
        threshold: u8,
        max_distance: f32,
    ) -> (f32, f32) {
        let input = image.as_array();
        let (height, width, _) = input.dim();
        let options = SnapOptions {
            radius,
            strength_threshold: threshold,
            max_distance,
            ..SnapOptions::default()
        };
        let field = EdgeField::build(input, width, height, &options);
        field.snap(Point::new(x, y), &options).into()
    }

    // ========================================================================
    // Masking
    // ========================================================================

    /// Apply a polygon (image coordinates) as the alpha channel of `image`.
    ///
    /// Returns an RGBA copy; `feather` is the Gaussian sigma of the edge.
    #[pyfunction]
    #[pyo3(signature = (image, points, feather=0.0))]
    pub fn composite_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        points: Vec<(f32, f32)>,
        feather: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = composite(image.as_array(), &to_points(&points), feather).map_err(py_err)?;
        Ok(result.pixels.into_pyarray(py))
    }

    /// Cut the region outlined by a canvas-space contour out of `image`.
    ///
    /// Returns the masked RGBA crop and its (x1, y1, x2, y2) box in image pixels.
    #[pyfunction]
    #[pyo3(signature = (
        image, points, canvas_width, canvas_height, padding=10.0, min_size=20.0, feather=0.0
    ))]
    pub fn cut_out_selection<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        points: Vec<(f32, f32)>,
        canvas_width: u32,
        canvas_height: u32,
        padding: f32,
        min_size: f32,
        feather: f32,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, (u32, u32, u32, u32))> {
        let options = MaskOptions {
            feather_radius: feather,
            ..MaskOptions::default()
        };
        let result = cut_out(
            image.as_array(),
            &to_points(&points),
            (canvas_width, canvas_height),
            padding,
            min_size,
            &options,
        )
        .map_err(py_err)?;
        let b = result.image_box;
        Ok((result.pixels.into_pyarray(py), (b.x1, b.y1, b.x2, b.y2)))
    }

    /// ContourStag Rust extension module
    #[pymodule]
    pub fn contourstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Contour geometry
        m.add_function(wrap_pyfunction!(resample_contour, m)?)?;
        m.add_function(wrap_pyfunction!(interpolate_contour, m)?)?;

        // Edge snapping
        m.add_function(wrap_pyfunction!(snap_to_edge, m)?)?;

        // Masking
        m.add_function(wrap_pyfunction!(composite_mask, m)?)?;
        m.add_function(wrap_pyfunction!(cut_out_selection, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::contourstag;
