//! scanprep - Deskew and margin-crop preprocessing for scanned page images
//!
//! Estimates the rotational skew and content margins of a rasterized page
//! image whose background is a roughly uniform color, then produces a
//! deskewed version cropped to the content bounds. Intended as a
//! preprocessing stage for scanned-document pipelines where input pages may
//! be slightly rotated and surrounded by uneven blank borders.
//!
//! # Features
//!
//! - **Margin/skew estimation** ([`skew`]) - Edge probing, margin depth and
//!   boundary-slope measurement, median aggregation
//! - **Pixel sampling** ([`sampler`]) - Lazy oriented pixel runs
//! - **Background classification** ([`background`]) - Contrast-tolerant
//!   background color matching
//! - **Configuration** ([`config`]) - TOML config files with CLI overrides
//! - **CLI** ([`cli`]) - Command-line interface with batch support
//!
//! # Quick Start
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
//!     Path::new("page.png"),
//!     Path::new("corrected.png"),
//!     &options,
//! ).unwrap();
//! println!("Angle: {:.2} degrees", result.detection.angle_degrees);
//! ```
//!
//! # Architecture
//!
//! ```text
//! SkewCorrector -> 4x EdgeProbe -> estimator (per probe)
//!                                     |
//!                         PixelSampler / Background
//!                                     |
//!                  SkewDetection -> rotate -> crop -> output
//! ```
//!
//! # License
//!
//! AGPL-3.0

pub mod background;
pub mod cli;
pub mod config;
pub mod sampler;
pub mod skew;
pub mod util;

// Re-exports for convenience
pub use background::Background;
pub use cli::{create_progress_bar, create_spinner, Cli, Commands, CorrectArgs, ExitCode};
pub use config::{CliOverrides, Config, ConfigError};
pub use sampler::{Direction, PixelSampler, Sample, SampleRun};
pub use skew::{
    CorrectionResult, CropBox, EdgeEstimate, EdgeProbe, QualityMode, SkewCorrector, SkewDetection,
    SkewError, SkewOptions, SkewOptionsBuilder, DEFAULT_BACKGROUND_COLOR, DEFAULT_CONTRAST,
    DEFAULT_MARGIN_LIMIT, DEFAULT_THRESHOLD_ANGLE, EDGE_SAMPLES, PRECISION,
};
pub use util::{ensure_dir_writable, ensure_file_exists, format_duration};
