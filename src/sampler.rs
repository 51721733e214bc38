//! Oriented pixel sampling
//!
//! Provides lazy pixel runs along a line through an image. A run starts at a
//! given point and advances a fixed number of pixels per step in one of the
//! four axis directions, terminating at the image boundary (or after an
//! optional sample count).
//!
//! Runs are plain iterators, so one run can be handed between consecutive
//! scan phases without restarting from its origin.

use image::RgbImage;

/// Axis-aligned sampling direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Per-step pixel offset for this direction.
    fn offsets(self) -> (i64, i64) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// One sampled pixel: position and RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub x: u32,
    pub y: u32,
    pub rgb: [u8; 3],
}

/// Pixel-exact sampler over an RGB image buffer.
///
/// The sampler borrows the image for the duration of one estimation run and
/// never mutates it.
#[derive(Debug)]
pub struct PixelSampler<'a> {
    image: &'a RgbImage,
    width: i64,
    height: i64,
}

impl<'a> PixelSampler<'a> {
    pub fn new(image: &'a RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            width: i64::from(width),
            height: i64::from(height),
        }
    }

    /// Start a sampling run at `(x, y)`, advancing `step` pixels per sample
    /// in `direction`. With `count = None` the run continues until it leaves
    /// the image; otherwise it yields at most `count` samples.
    ///
    /// A start point outside the image yields an empty run.
    pub fn run(
        &'a self,
        direction: Direction,
        x: i64,
        y: i64,
        step: i64,
        count: Option<usize>,
    ) -> SampleRun<'a> {
        let (dx, dy) = direction.offsets();
        SampleRun {
            sampler: self,
            x,
            y,
            dx: dx * step,
            dy: dy * step,
            remaining: count,
        }
    }
}

/// Stateful cursor over a sampling run.
///
/// Advancing the iterator consumes pixels permanently; callers that scan in
/// phases pass the same run (by `&mut`) from one phase to the next.
#[derive(Debug)]
pub struct SampleRun<'a> {
    sampler: &'a PixelSampler<'a>,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    remaining: Option<usize>,
}

impl Iterator for SampleRun<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.remaining == Some(0) {
            return None;
        }
        if self.x < 0 || self.y < 0 || self.x >= self.sampler.width || self.y >= self.sampler.height
        {
            return None;
        }

        let (x, y) = (self.x as u32, self.y as u32);
        let rgb = self.sampler.image.get_pixel(x, y).0;

        self.x += self.dx;
        self.y += self.dy;
        if let Some(n) = self.remaining.as_mut() {
            *n -= 1;
        }

        Some(Sample { x, y, rgb })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_run_right_counted() {
        let img = gradient_image(10, 10);
        let sampler = PixelSampler::new(&img);

        let samples: Vec<Sample> = sampler.run(Direction::Right, 2, 3, 1, Some(4)).collect();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], Sample { x: 2, y: 3, rgb: [2, 3, 0] });
        assert_eq!(samples[3], Sample { x: 5, y: 3, rgb: [5, 3, 0] });
    }

    #[test]
    fn test_run_terminates_at_boundary() {
        let img = gradient_image(10, 10);
        let sampler = PixelSampler::new(&img);

        let samples: Vec<Sample> = sampler.run(Direction::Down, 4, 7, 1, None).collect();

        // Rows 7, 8, 9 then out of bounds.
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.last().unwrap().y, 9);
    }

    #[test]
    fn test_run_with_step_spacing() {
        let img = gradient_image(20, 5);
        let sampler = PixelSampler::new(&img);

        let xs: Vec<u32> = sampler
            .run(Direction::Right, 3, 0, 5, Some(3))
            .map(|s| s.x)
            .collect();

        assert_eq!(xs, vec![3, 8, 13]);
    }

    #[test]
    fn test_run_leftward_and_upward() {
        let img = gradient_image(8, 8);
        let sampler = PixelSampler::new(&img);

        let xs: Vec<u32> = sampler
            .run(Direction::Left, 7, 0, 1, None)
            .map(|s| s.x)
            .collect();
        assert_eq!(xs, (0..=7).rev().collect::<Vec<u32>>());

        let ys: Vec<u32> = sampler
            .run(Direction::Up, 0, 7, 1, None)
            .map(|s| s.y)
            .collect();
        assert_eq!(ys, (0..=7).rev().collect::<Vec<u32>>());
    }

    #[test]
    fn test_run_from_outside_is_empty() {
        let img = gradient_image(4, 4);
        let sampler = PixelSampler::new(&img);

        assert_eq!(sampler.run(Direction::Right, -1, 0, 1, None).count(), 0);
        assert_eq!(sampler.run(Direction::Down, 0, 4, 1, None).count(), 0);
    }

    #[test]
    fn test_run_resumes_across_phases() {
        let img = gradient_image(10, 1);
        let sampler = PixelSampler::new(&img);
        let mut run = sampler.run(Direction::Right, 0, 0, 1, None);

        // First phase consumes three pixels.
        let mut consumed = 0;
        for sample in run.by_ref() {
            consumed += 1;
            if sample.x == 2 {
                break;
            }
        }
        assert_eq!(consumed, 3);

        // Second phase continues where the first stopped.
        let next = run.next().unwrap();
        assert_eq!(next.x, 3);
    }

    #[test]
    fn test_zero_step_repeats_point() {
        let img = gradient_image(4, 4);
        let sampler = PixelSampler::new(&img);

        let samples: Vec<Sample> = sampler.run(Direction::Right, 1, 1, 0, Some(3)).collect();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.x == 1 && s.y == 1));
    }
}
