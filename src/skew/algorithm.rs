//! Margin and skew estimation
//!
//! Implements the estimation engine: each side of the image is probed at a
//! few points spaced along the edge, each probe walks inward until the
//! uniform background ends, and the per-side margin depths and boundary
//! slopes are aggregated into one crop rectangle and one rotation angle.

use super::types::{
    CorrectionResult, CropBox, EdgeEstimate, QualityMode, Result, Side, SkewDetection, SkewError,
    SkewOptions, EDGE_SAMPLES, PRECISION,
};
use crate::background::Background;
use crate::sampler::{Direction, PixelSampler, SampleRun};
use image::{imageops, DynamicImage, GenericImageView, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

// ============================================================
// Edge Probe
// ============================================================

/// Sampling geometry for one side of the image.
///
/// A single parameterized type covers all four orientations; the
/// constructor encodes the per-side table (step basis, directions, origin).
#[derive(Debug, Clone, Copy)]
pub struct EdgeProbe {
    pub side: Side,
    /// Spacing between parallel sample points: the side's measured
    /// dimension divided by [`PRECISION`]
    pub step: u32,
    origin: (i64, i64),
    parallel: Direction,
    perpendicular: Direction,
}

impl EdgeProbe {
    pub fn new(side: Side, width: u32, height: u32) -> Self {
        let (width, height) = (i64::from(width), i64::from(height));
        let (step, parallel, perpendicular, origin) = match side {
            Side::Top => {
                let step = width / i64::from(PRECISION);
                (step, Direction::Right, Direction::Down, (step, 0))
            }
            Side::Right => {
                let step = height / i64::from(PRECISION);
                (step, Direction::Down, Direction::Left, (width - 1, step))
            }
            Side::Bottom => {
                let step = width / i64::from(PRECISION);
                (step, Direction::Left, Direction::Up, (width - step, height - 1))
            }
            Side::Left => {
                let step = height / i64::from(PRECISION);
                (step, Direction::Up, Direction::Right, (0, height - step))
            }
        };
        Self {
            side,
            step: step as u32,
            origin,
            parallel,
            perpendicular,
        }
    }

    /// The [`EDGE_SAMPLES`] probe start points, beginning one step inward
    /// from the nearest corner and spaced one step apart along the side.
    pub fn parallel_run<'a>(&self, sampler: &'a PixelSampler<'a>) -> SampleRun<'a> {
        sampler.run(
            self.parallel,
            self.origin.0,
            self.origin.1,
            i64::from(self.step),
            Some(EDGE_SAMPLES),
        )
    }

    /// Pixel-wise run from `(x, y)` into the image, unbounded until the
    /// opposite boundary.
    pub fn perpendicular_run<'a>(&self, sampler: &'a PixelSampler<'a>, x: u32, y: u32) -> SampleRun<'a> {
        sampler.run(self.perpendicular, i64::from(x), i64::from(y), 1, None)
    }
}

// ============================================================
// Skew Corrector
// ============================================================

/// Margin/skew estimation and correction over `image` buffers.
pub struct SkewCorrector;

impl SkewCorrector {
    /// Estimate margins and rotation without producing a corrected image.
    pub fn detect(image: &DynamicImage, options: &SkewOptions) -> Result<SkewDetection> {
        Self::detect_rgb(&image.to_rgb8(), options)
    }

    /// Estimate margins and rotation for an RGB buffer.
    pub fn detect_rgb(image: &RgbImage, options: &SkewOptions) -> Result<SkewDetection> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SkewError::InvalidImage(format!(
                "degenerate dimensions {}x{}",
                width, height
            )));
        }

        let sampler = PixelSampler::new(image);
        let background = Background::new(options.background);

        let mut edges = [EdgeEstimate::default(); 4];
        for (estimate, side) in edges.iter_mut().zip(Side::ALL) {
            let probe = EdgeProbe::new(side, width, height);
            *estimate = Self::estimate_edge(&sampler, &probe, &background, options);
        }

        // Margins are measured relative to their own side; right and bottom
        // become absolute coordinates.
        let crop = CropBox {
            left: i64::from(edges[0].distance),
            top: i64::from(edges[1].distance),
            right: i64::from(width) - i64::from(edges[2].distance),
            bottom: i64::from(height) - i64::from(edges[3].distance),
        };

        let angles: Vec<f64> = edges.iter().map(|e| e.angle).collect();
        let angle_degrees = median(&angles).to_degrees();

        Ok(SkewDetection { crop, angle_degrees, edges })
    }

    /// Deskew and crop an image in memory.
    ///
    /// The rotation angle and the crop rectangle are both measured on the
    /// original image; the crop is then applied to the rotated canvas. For
    /// the small angles this corrector targets the margins remain valid
    /// after rotation.
    pub fn correct_image(
        image: &DynamicImage,
        options: &SkewOptions,
    ) -> Result<(DynamicImage, SkewDetection)> {
        let rgb = image.to_rgb8();
        let detection = Self::detect_rgb(&rgb, options)?;
        let (corrected, _) = Self::apply(&rgb, &detection, options)?;
        Ok((DynamicImage::ImageRgb8(corrected), detection))
    }

    /// Deskew and crop an image file, writing the result to `output_path`.
    pub fn correct(
        input_path: &Path,
        output_path: &Path,
        options: &SkewOptions,
    ) -> Result<CorrectionResult> {
        if !input_path.exists() {
            return Err(SkewError::ImageNotFound(input_path.to_path_buf()));
        }

        let img =
            image::open(input_path).map_err(|e| SkewError::InvalidImage(e.to_string()))?;
        let original_size = (img.width(), img.height());

        let rgb = img.to_rgb8();
        let detection = Self::detect_rgb(&rgb, options)?;
        let (corrected, rotated) = Self::apply(&rgb, &detection, options)?;
        let corrected_size = corrected.dimensions();

        corrected
            .save(output_path)
            .map_err(|e| SkewError::CorrectionFailed(e.to_string()))?;

        Ok(CorrectionResult {
            detection,
            rotated,
            output_path: output_path.to_path_buf(),
            original_size,
            corrected_size,
        })
    }

    /// Batch correction; each image is corrected independently and in
    /// parallel.
    pub fn correct_batch(
        images: &[(PathBuf, PathBuf)],
        options: &SkewOptions,
    ) -> Vec<Result<CorrectionResult>> {
        images
            .par_iter()
            .map(|(input, output)| Self::correct(input, output, options))
            .collect()
    }

    /// Rotate (unless below the threshold angle) and crop per a detection.
    fn apply(
        image: &RgbImage,
        detection: &SkewDetection,
        options: &SkewOptions,
    ) -> Result<(RgbImage, bool)> {
        let rotate = detection.angle_degrees.abs() > options.threshold_angle;
        let cropped = if rotate {
            let rotated = rotate_page(image, detection.angle_degrees, options);
            crop_page(&rotated, &detection.crop)?
        } else {
            crop_page(image, &detection.crop)?
        };
        Ok((cropped, rotate))
    }

    /// Estimate the margin depth and boundary slope for one side.
    fn estimate_edge(
        sampler: &PixelSampler,
        probe: &EdgeProbe,
        background: &Background,
        options: &SkewOptions,
    ) -> EdgeEstimate {
        let mut distances: Vec<u32> = Vec::with_capacity(EDGE_SAMPLES);

        for start in probe.parallel_run(sampler) {
            let mut run = probe.perpendicular_run(sampler, start.x, start.y);
            let mut distance: u32 = 0;

            // Boundary-seek: consume pixels until background is found,
            // inclusive. Absorbs non-background noise at the physical edge.
            for sample in run.by_ref() {
                distance += 1;
                let [r, g, b] = sample.rgb;
                if background.matches(r, g, b, options.contrast) {
                    break;
                }
            }

            // Background-run: continue the same cursor while background
            // holds; the first content pixel ends the margin.
            for sample in run {
                let [r, g, b] = sample.rgb;
                if !background.matches(r, g, b, options.contrast) {
                    break;
                }
                distance += 1;
            }

            distances.push(distance);
        }

        if distances.is_empty() {
            // Degenerate geometry (image smaller than the sampling grid):
            // margin limit reached immediately.
            return EdgeEstimate { distance: options.margin_limit, angle: 0.0 };
        }

        // Local slopes come from the raw distances; clamping applies only to
        // the margin aggregation.
        let angles: Vec<f64> = distances
            .windows(2)
            .map(|pair| (f64::from(pair[1]) - f64::from(pair[0])).atan2(f64::from(probe.step)))
            .collect();
        let clamped: Vec<f64> = distances
            .iter()
            .map(|&d| f64::from(d.min(options.margin_limit)))
            .collect();

        EdgeEstimate {
            distance: median(&clamped) as u32,
            angle: median(&angles),
        }
    }
}

// ============================================================
// Rotate / Crop primitives
// ============================================================

/// Rotate about the image center onto a same-size canvas filled with the
/// background color.
fn rotate_page(image: &RgbImage, angle_degrees: f64, options: &SkewOptions) -> RgbImage {
    let interpolation = match options.quality_mode {
        QualityMode::Fast => Interpolation::Bilinear,
        QualityMode::Standard => Interpolation::Bicubic,
    };
    // A positive detected angle is a clockwise page tilt; the correction is
    // the counter-clockwise rotation, and rotate_about_center takes
    // clockwise-positive theta.
    rotate_about_center(
        image,
        -(angle_degrees.to_radians()) as f32,
        interpolation,
        Rgb(options.background),
    )
}

fn crop_page(image: &RgbImage, crop: &CropBox) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if !crop.is_valid(width, height) {
        return Err(SkewError::InvalidCropRect {
            left: crop.left,
            top: crop.top,
            right: crop.right,
            bottom: crop.bottom,
            width,
            height,
        });
    }
    Ok(imageops::crop_imm(
        image,
        crop.left as u32,
        crop.top as u32,
        crop.width() as u32,
        crop.height() as u32,
    )
    .to_image())
}

/// Median with a deterministic even-count rule: the mean of the two middle
/// elements.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
