//! Tunable parameters for capture, editing, snapping and mask output.
//!
//! Every section deserializes with `#[serde(default)]`, so a JSON document
//! only needs to name the values it overrides:
//!
//! ```
//! use contourstag::config::SelectionConfig;
//!
//! let config = SelectionConfig::from_json(r#"{ "snap": { "strength_threshold": 60 } }"#).unwrap();
//! assert_eq!(config.snap.strength_threshold, 60);
//! assert_eq!(config.snap.radius, 12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

/// Complete editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub points: PointLimits,
    pub capture: CaptureOptions,
    pub snap: SnapOptions,
    pub mask: MaskOptions,
}

impl SelectionConfig {
    /// Parse a (possibly partial) JSON configuration document and validate it.
    pub fn from_json(data: &str) -> Result<Self, SelectionError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values the editor relies on to always produce a usable contour.
    ///
    /// # Errors
    /// * `OutOfRange` - `points.min_count` below 4 or above `points.max_count`
    /// * `Config` - a zero step, spline sample count or output size, or an
    ///   ellipse with fewer than 3 vertices
    pub fn validate(&self) -> Result<(), SelectionError> {
        self.points.validate()?;
        if self.capture.ellipse_vertices < 3 {
            return Err(SelectionError::Config(format!(
                "capture.ellipse_vertices must be at least 3, got {}",
                self.capture.ellipse_vertices
            )));
        }
        if self.mask.max_output_size == Some(0) {
            return Err(SelectionError::Config("mask.max_output_size must be positive".into()));
        }
        Ok(())
    }
}

/// Bounds and step for the number of editable control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLimits {
    pub min_count: usize,
    pub max_count: usize,
    /// Change in count per arrow key or swipe gesture.
    pub step: usize,
    /// Control points produced from a finished freehand stroke.
    pub initial_freehand_count: usize,
    /// Samples emitted per spline segment at commit.
    pub spline_samples: usize,
}

impl Default for PointLimits {
    fn default() -> Self {
        Self {
            min_count: 8,
            max_count: 200,
            step: 5,
            initial_freehand_count: 24,
            spline_samples: 10,
        }
    }
}

impl PointLimits {
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.min_count < 4 || self.min_count > self.max_count {
            return Err(SelectionError::OutOfRange {
                what: "points.min_count",
                value: self.min_count as f32,
                min: 4.0,
                max: self.max_count as f32,
            });
        }
        if self.step == 0 {
            return Err(SelectionError::Config("points.step must be at least 1".into()));
        }
        if self.spline_samples == 0 {
            return Err(SelectionError::Config("points.spline_samples must be at least 1".into()));
        }
        Ok(())
    }

    /// `initial_freehand_count` brought inside the limits.
    pub fn initial_count(&self) -> usize {
        self.initial_freehand_count.min(self.max_count).max(self.min_count)
    }

    /// Count an "increase" gesture moves to, or `None` when already at the top.
    pub fn step_up(&self, current: usize) -> Option<usize> {
        let next = (current + self.step).min(self.max_count);
        (next > current).then_some(next)
    }

    /// Count a "decrease" gesture moves to, or `None` when already at the bottom.
    pub fn step_down(&self, current: usize) -> Option<usize> {
        let next = current.saturating_sub(self.step).max(self.min_count);
        (next < current).then_some(next)
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min_count..=self.max_count).contains(&count)
    }
}

/// Pointer-handling thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// A freehand stroke needs more samples than this to become a selection.
    pub freehand_min_samples: usize,
    /// Minimum number of dots before Enter finishes dot capture.
    pub dots_min_points: usize,
    /// Radius within which a press grabs a control point.
    pub grab_radius: f32,
    /// Radius within which a control point counts as hovered.
    pub hover_radius: f32,
    /// Accumulated vertical motion that triggers one resample step.
    pub swipe_threshold: f32,
    /// Vertices of the polygon an ellipse drag expands to.
    pub ellipse_vertices: usize,
    /// Bounding-box margin for freehand and dot contours.
    pub freeform_padding: f32,
    /// Bounding-box margin for rectangle and ellipse drags.
    pub shape_padding: f32,
    /// Smallest accepted selection width or height, in canvas pixels.
    pub min_selection_size: f32,
    /// Snap placed points to edges even without the Alt modifier.
    pub snap_by_default: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            freehand_min_samples: 10,
            dots_min_points: 3,
            grab_radius: 20.0,
            hover_radius: 15.0,
            swipe_threshold: 80.0,
            ellipse_vertices: 32,
            freeform_padding: 10.0,
            shape_padding: 5.0,
            min_selection_size: 20.0,
            snap_by_default: false,
        }
    }
}

/// Edge snapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    /// Half-size of the square search window.
    pub radius: u32,
    /// Edge strength must exceed this (0-255).
    pub strength_threshold: u8,
    /// Candidates must lie strictly closer than this.
    pub max_distance: f32,
    /// Sigma of the smoothing pass applied after gradient computation.
    pub smoothing_sigma: f32,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            radius: 12,
            strength_threshold: 40,
            max_distance: 10.0,
            smoothing_sigma: 1.0,
        }
    }
}

/// How the blurred mask is re-thresholded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Above the cutoff is opaque, everything else transparent.
    Hard,
    /// Below the cutoff is transparent, the rest ramps up to opaque.
    Soft,
}

/// Mask rasterization and feathering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Gaussian sigma of the feather; 0 keeps the exact polygon fill.
    pub feather_radius: f32,
    /// Re-threshold cutoff after blurring (0-255).
    pub cutoff: u8,
    pub edge_mode: EdgeMode,
    /// Blur-then-hard-threshold clean-up applied before feathering; 0 disables.
    pub smoothing_sigma: f32,
    /// Longest side of a cut-out or whole-image result; larger results are
    /// downscaled. `None` keeps the source resolution.
    pub max_output_size: Option<u32>,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            feather_radius: 0.0,
            cutoff: 80,
            edge_mode: EdgeMode::Soft,
            smoothing_sigma: 3.0,
            max_output_size: Some(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = SelectionConfig::default();
        assert_eq!(config.points.min_count, 8);
        assert_eq!(config.points.max_count, 200);
        assert_eq!(config.points.step, 5);
        assert_eq!(config.snap.radius, 12);
        assert_eq!(config.snap.strength_threshold, 40);
        assert_eq!(config.snap.max_distance, 10.0);
        assert_eq!(config.mask.cutoff, 80);
        assert_eq!(config.mask.smoothing_sigma, 3.0);
        assert_eq!(config.capture.freeform_padding, 10.0);
        assert_eq!(config.capture.shape_padding, 5.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SelectionConfig::from_json(
            r#"{
                "points": { "step": 10 },
                "mask": { "edge_mode": "hard", "feather_radius": 2.5 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.points.step, 10);
        assert_eq!(config.points.max_count, 200);
        assert_eq!(config.mask.edge_mode, EdgeMode::Hard);
        assert_eq!(config.mask.feather_radius, 2.5);
        assert_eq!(config.mask.cutoff, 80);
        assert_eq!(config.mask.smoothing_sigma, 3.0);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = SelectionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SelectionError::Config(_)));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SelectionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_min_count_above_max_rejected() {
        let json = r#"{ "points": { "min_count": 50, "max_count": 20 } }"#;
        let err = SelectionConfig::from_json(json).unwrap_err();
        assert!(matches!(err, SelectionError::OutOfRange { what: "points.min_count", .. }));
    }

    #[test]
    fn test_min_count_below_four_rejected() {
        for json in [
            r#"{ "points": { "min_count": 0, "initial_freehand_count": 0 } }"#,
            r#"{ "points": { "min_count": 3 } }"#,
        ] {
            let err = SelectionConfig::from_json(json).unwrap_err();
            assert!(
                matches!(err, SelectionError::OutOfRange { what: "points.min_count", .. }),
                "{json}"
            );
        }
        assert!(SelectionConfig::from_json(r#"{ "points": { "min_count": 4 } }"#).is_ok());
    }

    #[test]
    fn test_zero_step_and_samples_rejected() {
        for json in [
            r#"{ "points": { "step": 0 } }"#,
            r#"{ "points": { "spline_samples": 0 } }"#,
            r#"{ "capture": { "ellipse_vertices": 2 } }"#,
            r#"{ "mask": { "max_output_size": 0 } }"#,
        ] {
            let err = SelectionConfig::from_json(json).unwrap_err();
            assert!(matches!(err, SelectionError::Config(_)), "{json}: {err}");
        }
        let json = r#"{ "mask": { "max_output_size": null } }"#;
        let config = SelectionConfig::from_json(json).unwrap();
        assert_eq!(config.mask.max_output_size, None);
    }

    #[test]
    fn test_initial_count_stays_in_limits() {
        let mut limits = PointLimits::default();
        assert_eq!(limits.initial_count(), 24);
        limits.initial_freehand_count = 2;
        assert_eq!(limits.initial_count(), 8);
        limits.initial_freehand_count = 900;
        assert_eq!(limits.initial_count(), 200);
        // Inverted limits never panic; validation reports them.
        limits.min_count = 50;
        limits.max_count = 20;
        assert_eq!(limits.initial_count(), 50);
    }

    #[test]
    fn test_step_policy() {
        let limits = PointLimits::default();
        assert_eq!(limits.step_up(24), Some(29));
        assert_eq!(limits.step_up(198), Some(200));
        assert_eq!(limits.step_up(200), None);
        assert_eq!(limits.step_down(24), Some(19));
        assert_eq!(limits.step_down(10), Some(8));
        assert_eq!(limits.step_down(8), None);
        // Below the minimum a decrease cannot shrink further.
        assert_eq!(limits.step_down(5), None);
        assert_eq!(limits.step_up(3), Some(8));
    }
}
