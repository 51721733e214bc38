//! Skew module core types
//!
//! Contains basic data structures for margin/skew estimation and correction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Number of segments each side is divided into for sampling
pub const PRECISION: u32 = 6;

/// Parallel sample points probed per side; the two segments nearest the
/// corners are skipped to avoid corner-distortion artifacts
pub const EDGE_SAMPLES: usize = (PRECISION - 2) as usize;

/// Default background contrast tolerance
pub const DEFAULT_CONTRAST: u8 = 10;

/// Default cap on how far into the image a margin search may extend (pixels)
pub const DEFAULT_MARGIN_LIMIT: u32 = 80;

/// Default background color (white) for classification and rotation fill
pub const DEFAULT_BACKGROUND_COLOR: [u8; 3] = [255, 255, 255];

/// Default threshold angle - rotations at or below this are skipped (degrees)
pub const DEFAULT_THRESHOLD_ANGLE: f64 = 0.0;

// ============================================================
// Error Types
// ============================================================

/// Skew correction error types
#[derive(Debug, Error)]
pub enum SkewError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error(
        "Invalid crop rectangle ({left}, {top}, {right}, {bottom}) for {width}x{height} image"
    )]
    InvalidCropRect {
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
        width: u32,
        height: u32,
    },

    #[error("Correction failed: {0}")]
    CorrectionFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SkewError>;

// ============================================================
// Sides and Options
// ============================================================

/// One of the four image borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Probe order used by the corrector. Per-side results are reported in
    /// this order: left, top, right, bottom.
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];
}

/// Interpolation quality for the correction rotation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityMode {
    /// Fast (bilinear interpolation)
    Fast,
    /// Standard (bicubic interpolation)
    #[default]
    Standard,
}

/// Skew correction options
#[derive(Debug, Clone)]
pub struct SkewOptions {
    /// Background contrast tolerance (per channel)
    pub contrast: u8,
    /// Maximum detectable margin per side (pixels)
    pub margin_limit: u32,
    /// Background color for classification and rotation fill
    pub background: [u8; 3],
    /// Quality mode for interpolation
    pub quality_mode: QualityMode,
    /// Rotations at or below this angle are skipped (degrees)
    pub threshold_angle: f64,
}

impl Default for SkewOptions {
    fn default() -> Self {
        Self {
            contrast: DEFAULT_CONTRAST,
            margin_limit: DEFAULT_MARGIN_LIMIT,
            background: DEFAULT_BACKGROUND_COLOR,
            quality_mode: QualityMode::Standard,
            threshold_angle: DEFAULT_THRESHOLD_ANGLE,
        }
    }
}

impl SkewOptions {
    /// Create a new options builder
    pub fn builder() -> SkewOptionsBuilder {
        SkewOptionsBuilder::default()
    }

    /// Create options optimized for fast processing
    pub fn fast() -> Self {
        Self {
            quality_mode: QualityMode::Fast,
            threshold_angle: 0.5, // Skip small corrections
            ..Default::default()
        }
    }
}

/// Builder for SkewOptions
#[derive(Debug, Default)]
pub struct SkewOptionsBuilder {
    options: SkewOptions,
}

impl SkewOptionsBuilder {
    /// Set the background contrast tolerance
    #[must_use]
    pub fn contrast(mut self, contrast: u8) -> Self {
        self.options.contrast = contrast;
        self
    }

    /// Set the maximum detectable margin per side
    #[must_use]
    pub fn margin_limit(mut self, limit: u32) -> Self {
        self.options.margin_limit = limit;
        self
    }

    /// Set the background color
    #[must_use]
    pub fn background(mut self, color: [u8; 3]) -> Self {
        self.options.background = color;
        self
    }

    /// Set the quality mode
    #[must_use]
    pub fn quality_mode(mut self, mode: QualityMode) -> Self {
        self.options.quality_mode = mode;
        self
    }

    /// Set the rotation skip threshold
    #[must_use]
    pub fn threshold_angle(mut self, angle: f64) -> Self {
        self.options.threshold_angle = angle.abs();
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> SkewOptions {
        self.options
    }
}

// ============================================================
// Result Types
// ============================================================

/// Estimate produced for one side of the image.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeEstimate {
    /// Margin depth in pixels, measured inward from the physical edge,
    /// clamped to the margin limit
    pub distance: u32,
    /// Local slope of the background/content boundary (radians)
    pub angle: f64,
}

/// Absolute crop rectangle in image coordinates.
///
/// Coordinates are signed: inconsistent margin estimates can produce an
/// inverted or out-of-range box, which is rejected only when the crop is
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl CropBox {
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Whether the box selects a non-empty region inside a
    /// `width` x `height` image.
    pub fn is_valid(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right <= i64::from(width)
            && self.bottom <= i64::from(height)
            && self.width() > 0
            && self.height() > 0
    }
}

/// Skew detection result
#[derive(Debug, Clone)]
pub struct SkewDetection {
    /// Absolute crop rectangle in original image coordinates
    pub crop: CropBox,
    /// Estimated page rotation in degrees (positive = clockwise tilt)
    pub angle_degrees: f64,
    /// Per-side estimates in probe order (left, top, right, bottom)
    pub edges: [EdgeEstimate; 4],
}

/// Correction operation result
#[derive(Debug)]
pub struct CorrectionResult {
    /// Detection the correction was computed from
    pub detection: SkewDetection,
    /// Whether a rotation was applied (false when below the threshold angle)
    pub rotated: bool,
    /// Output image path
    pub output_path: PathBuf,
    /// Original image size
    pub original_size: (u32, u32),
    /// Corrected image size
    pub corrected_size: (u32, u32),
}
