//! Aspect ratio model: a continuous width-to-height value bounded to the
//! range the product supports, with the slider mapping and display labels.

use serde::{Deserialize, Serialize};

/// Narrowest supported ratio (4:5 portrait).
pub const MIN_RATIO: f64 = 0.8;
/// Widest supported ratio (1.91:1 landscape).
pub const MAX_RATIO: f64 = 1.91;
/// Tolerance under which a source ratio counts as matching the target
/// (no visible bars after fitting).
pub const RATIO_MATCH_EPSILON: f64 = 0.01;

/// A width-to-height ratio, always within `[MIN_RATIO, MAX_RATIO]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectRatio(f64);

impl Default for AspectRatio {
    fn default() -> Self {
        Self(1.0)
    }
}

impl AspectRatio {
    /// Create a ratio, clamping into the supported range.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(MIN_RATIO, MAX_RATIO))
    }

    /// Ratio of a raster, clamped. Used to seed a crop session with the
    /// source image's own shape.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height == 0 {
            return Self::default();
        }
        Self::new(width as f64 / height as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Map a slider position in `[0, 100]` onto the ratio range.
    pub fn from_slider(position: f64) -> Self {
        let position = position.clamp(0.0, 100.0);
        Self(MIN_RATIO + (position / 100.0) * (MAX_RATIO - MIN_RATIO))
    }

    /// Inverse of [`AspectRatio::from_slider`].
    pub fn to_slider(self) -> f64 {
        (self.0 - MIN_RATIO) / (MAX_RATIO - MIN_RATIO) * 100.0
    }

    /// Human-readable bucket label. Display and persistence only, never
    /// authoritative for geometry.
    pub fn label(self) -> &'static str {
        if self.0 <= 0.85 {
            "4:5"
        } else if self.0 <= 1.05 {
            "1:1"
        } else if self.0 <= 1.35 {
            "4:3"
        } else if self.0 <= 1.65 {
            "16:10"
        } else {
            "1.91:1"
        }
    }

    /// Whether two ratios are close enough that fitting produces no bars.
    pub fn matches(self, other: AspectRatio) -> bool {
        (self.0 - other.0).abs() < RATIO_MATCH_EPSILON
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
