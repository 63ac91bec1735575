//! Graphics options: the per-call configuration of a draw.

use crate::compositor::{AlphaCompositionMode, BlendMode, ColorBlendingMode};
use crate::error::{DrawError, Result};

/// Sub-scanlines per pixel row callers usually ask for.
pub const DEFAULT_ANTIALIAS_SAMPLES: u32 = 5;

/// Flattening tolerance in pixels callers usually ask for.
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Settings that govern how a shape is rasterized and composited.
///
/// Every draw call states its options in full; the constants in this module
/// hold the customary values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsOptions {
    /// Fractional edge coverage when set; hard 0/1 coverage otherwise.
    pub antialias: bool,
    /// Vertical sub-scanlines per pixel row. Ignored without antialiasing.
    pub antialias_samples: u32,
    /// Scales every coverage value before compositing, in [0, 1].
    pub blend_percentage: f32,
    pub color_blending_mode: ColorBlendingMode,
    pub alpha_composition_mode: AlphaCompositionMode,
    /// Maximum distance between a curve and its flattened polyline.
    pub tolerance: f64,
}

impl GraphicsOptions {
    pub fn blend_mode(&self) -> BlendMode {
        BlendMode::new(self.color_blending_mode, self.alpha_composition_mode)
    }

    /// Sample rows per pixel row the rasterizer actually uses.
    pub fn effective_samples(&self) -> u32 {
        if self.antialias {
            self.antialias_samples
        } else {
            1
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.antialias && self.antialias_samples == 0 {
            return Err(DrawError::options("antialias_samples must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.blend_percentage) {
            return Err(DrawError::options(format!(
                "blend_percentage must lie in [0, 1], got {}",
                self.blend_percentage
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(DrawError::options(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
