//! Compositor: blends a brush color into an existing pixel.
//!
//! Blending is done on non-premultiplied linear values in two stages: a
//! per-channel color blend function combines the backdrop and source colors,
//! then a Porter-Duff operator weighs backdrop, source and blended color by
//! their alphas. Coverage scales the source alpha before either stage.

use crate::color::{Pixel, Rgba};

/// Alpha below which a composited pixel is treated as fully transparent.
const ALPHA_EPSILON: f64 = 1e-12;

// ============================================================================
// Modes
// ============================================================================

/// Per-channel color blend function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBlendingMode {
    /// The source color.
    Normal,
    Multiply,
    /// Sum, saturating at 1.
    Add,
    /// Backdrop minus source, saturating at 0.
    Subtract,
    Screen,
    Darken,
    Lighten,
    Overlay,
    HardLight,
}

/// Porter-Duff alpha composition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaCompositionMode {
    Clear,
    Src,
    SrcAtop,
    SrcIn,
    SrcOut,
    SrcOver,
    Dest,
    DestAtop,
    DestIn,
    DestOut,
    DestOver,
    Xor,
}

/// A color blend function paired with an alpha composition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendMode {
    pub color: ColorBlendingMode,
    pub alpha: AlphaCompositionMode,
}

impl BlendMode {
    /// Plain source-over painting.
    pub const NORMAL: BlendMode = BlendMode {
        color: ColorBlendingMode::Normal,
        alpha: AlphaCompositionMode::SrcOver,
    };

    pub const fn new(color: ColorBlendingMode, alpha: AlphaCompositionMode) -> Self {
        Self { color, alpha }
    }
}

// ============================================================================
// Blending
// ============================================================================

/// Blend `brush` into `existing` at `coverage`.
///
/// Coverage is clamped to [0, 1]. Coverage 0 returns `existing` unchanged.
/// At coverage 1, `Src` returns exactly the brush, and normal source-over
/// returns exactly the brush whenever the brush is opaque.
pub fn blend<P: Pixel>(existing: P, brush: Rgba, coverage: f32, mode: BlendMode) -> P {
    let amount = if coverage.is_nan() {
        0.0
    } else {
        coverage.clamp(0.0, 1.0) as f64
    };
    if amount == 0.0 {
        return existing;
    }

    let source = Rgba::with_opacity(&brush, brush.a.clamp(0.0, 1.0) * amount);
    if mode.alpha == AlphaCompositionMode::Src {
        return P::from_rgba(source);
    }
    if mode == BlendMode::NORMAL && source.a >= 1.0 {
        return P::from_rgba(source);
    }

    let backdrop = existing.to_rgba();
    P::from_rgba(compose(backdrop, source, mode))
}

/// Composite `source` over `backdrop` in the working color space.
pub fn compose(backdrop: Rgba, source: Rgba, mode: BlendMode) -> Rgba {
    use AlphaCompositionMode::*;

    match mode.alpha {
        Clear => Rgba::TRANSPARENT,
        Src => source,
        Dest => backdrop,
        SrcOver => over(backdrop, source, blend_color(mode.color, backdrop, source)),
        SrcAtop => atop(backdrop, source, blend_color(mode.color, backdrop, source)),
        SrcIn => Rgba::with_opacity(&source, backdrop.a * source.a),
        SrcOut => Rgba::with_opacity(&source, (1.0 - backdrop.a) * source.a),
        DestOver => over(source, backdrop, blend_color(mode.color, source, backdrop)),
        DestAtop => atop(source, backdrop, blend_color(mode.color, source, backdrop)),
        DestIn => Rgba::with_opacity(&backdrop, source.a * backdrop.a),
        DestOut => Rgba::with_opacity(&backdrop, (1.0 - source.a) * backdrop.a),
        Xor => xor(backdrop, source),
    }
}

/// Color blend of the backdrop `b` and source `s`, alpha taken from `s`.
fn blend_color(mode: ColorBlendingMode, b: Rgba, s: Rgba) -> Rgba {
    let f: fn(f64, f64) -> f64 = match mode {
        ColorBlendingMode::Normal => return s,
        ColorBlendingMode::Multiply => |b, s| b * s,
        ColorBlendingMode::Add => |b, s| (b + s).min(1.0),
        ColorBlendingMode::Subtract => |b, s| (b - s).max(0.0),
        ColorBlendingMode::Screen => |b, s| 1.0 - (1.0 - b) * (1.0 - s),
        ColorBlendingMode::Darken => f64::min,
        ColorBlendingMode::Lighten => f64::max,
        ColorBlendingMode::Overlay => |b, s| hard_mix(b, b, s),
        ColorBlendingMode::HardLight => |b, s| hard_mix(s, b, s),
    };
    Rgba::new(f(b.r, s.r), f(b.g, s.g), f(b.b, s.b), s.a)
}

/// Overlay / hard-light: multiply below the midpoint of `cond`, screen above.
#[inline]
fn hard_mix(cond: f64, b: f64, s: f64) -> f64 {
    if cond < 0.5 {
        2.0 * b * s
    } else {
        1.0 - 2.0 * (1.0 - b) * (1.0 - s)
    }
}

/// `src` over `dst`, with `blend` used where both overlap.
fn over(dst: Rgba, src: Rgba, blend: Rgba) -> Rgba {
    let blend_w = dst.a * src.a;
    let dst_w = dst.a - blend_w;
    let src_w = src.a - blend_w;
    let alpha = dst_w + src.a;
    weigh(dst, dst_w, src, src_w, blend, blend_w, alpha)
}

/// `src` atop `dst`: only where `dst` is present.
fn atop(dst: Rgba, src: Rgba, blend: Rgba) -> Rgba {
    let blend_w = dst.a * src.a;
    let dst_w = dst.a - blend_w;
    weigh(dst, dst_w, src, 0.0, blend, blend_w, dst.a)
}

fn xor(dst: Rgba, src: Rgba) -> Rgba {
    let src_w = src.a * (1.0 - dst.a);
    let dst_w = dst.a * (1.0 - src.a);
    weigh(dst, dst_w, src, src_w, src, 0.0, src_w + dst_w)
}

#[inline]
fn weigh(
    dst: Rgba,
    dst_w: f64,
    src: Rgba,
    src_w: f64,
    blend: Rgba,
    blend_w: f64,
    alpha: f64,
) -> Rgba {
    if alpha <= ALPHA_EPSILON {
        return Rgba::TRANSPARENT;
    }
    let channel = |d: f64, s: f64, b: f64| (d * dst_w + s * src_w + b * blend_w) / alpha;
    Rgba::new(
        channel(dst.r, src.r, blend.r),
        channel(dst.g, src.g, blend.g),
        channel(dst.b, src.b, blend.b),
        alpha,
    )
}

// ============================================================================
// Tests
// ============================================================================
