//! Skew correction module
//!
//! Estimates the rotational skew and content margins of a scanned page
//! image with a roughly uniform background, then produces a deskewed,
//! cropped version of the image.
//!
//! Each side of the page is probed at a few points; every probe walks
//! inward from the physical edge until the background ends, giving a margin
//! depth. Consecutive depths along one side give local boundary slopes.
//! Medians aggregate the depths into a crop rectangle and the slopes into a
//! single rotation angle, so a stray speckle or an off-page probe cannot
//! dominate the estimate.
//!
//! # Example
//!
//! ```rust,no_run
//! use scanprep::{SkewCorrector, SkewOptions};
//! use std::path::Path;
//!
//! let options = SkewOptions::builder()
//!     .contrast(10)
//!     .margin_limit(80)
//!     .build();
//!
//! let result = SkewCorrector::correct(
//!     Path::new("scanned.png"),
//!     Path::new("corrected.png"),
//!     &options,
//! ).unwrap();
//!
//! println!("Rotated by {:.2} degrees", result.detection.angle_degrees);
//! ```

// Submodules
mod algorithm;
mod types;

// Re-export public API
pub use algorithm::{EdgeProbe, SkewCorrector};
pub use types::{
    CorrectionResult, CropBox, EdgeEstimate, QualityMode, Result, Side, SkewDetection, SkewError,
    SkewOptions, SkewOptionsBuilder, DEFAULT_BACKGROUND_COLOR, DEFAULT_CONTRAST,
    DEFAULT_MARGIN_LIMIT, DEFAULT_THRESHOLD_ANGLE, EDGE_SAMPLES, PRECISION,
};
