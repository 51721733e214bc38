//! Background color classification
//!
//! A page's blank border is assumed to be a single roughly uniform color.
//! [`Background`] holds that reference color and classifies pixels against
//! it with a per-channel contrast tolerance.

/// Reference background color for a correction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    rgb: [u8; 3],
}

impl Default for Background {
    /// White, the typical scanned-page background.
    fn default() -> Self {
        Self { rgb: [255, 255, 255] }
    }
}

impl Background {
    pub fn new(rgb: [u8; 3]) -> Self {
        Self { rgb }
    }

    /// The reference color.
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    /// Whether a pixel is close enough to the background color.
    ///
    /// Every channel must be within `contrast` of the reference channel.
    pub fn matches(&self, r: u8, g: u8, b: u8, contrast: u8) -> bool {
        r.abs_diff(self.rgb[0]) <= contrast
            && g.abs_diff(self.rgb[1]) <= contrast
            && b.abs_diff(self.rgb[2]) <= contrast
    }
}
