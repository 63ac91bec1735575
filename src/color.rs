//! Color types and pixel encodings.
//!
//! [`Rgba`] is the working color: non-premultiplied linear f64 components in
//! [0, 1]. Every blend happens in this space. The pixel encodings a buffer
//! can be made of implement the sealed [`Pixel`] trait, which unpacks to and
//! packs from `Rgba`:
//! - `Rgba8`, `Bgra8`: u8 per channel with alpha
//! - `Rgb8`: u8 per channel, no alpha
//! - `Gray8`, `Gray16`: luminance + alpha
//! - `Rgba16`: u16 per channel
//! - `RgbaF32`: f32 per channel
//!
//! Packing clamps to the channel range and rounds half away from zero.
//! Gray encodings pack BT.709 luminance; encodings without alpha drop it.

use bytemuck::{Pod, Zeroable};

// ============================================================================
// Rgba (f64 precision color)
// ============================================================================

/// RGBA color with f64 components in range [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_opacity(c: &Rgba, a: f64) -> Self {
        Self { a, ..*c }
    }

    /// Components clamped to [0, 1].
    pub fn clamped(&self) -> Rgba {
        Rgba {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// BT.709 luminance of the color channels.
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

// ============================================================================
// Channel packing
// ============================================================================

#[inline]
fn pack_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn pack_u16(v: f64) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}

#[inline]
fn unpack_u8(v: u8) -> f64 {
    v as f64 / 255.0
}

#[inline]
fn unpack_u16(v: u16) -> f64 {
    v as f64 / 65535.0
}

// ============================================================================
// Pixel trait
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// A pixel encoding a buffer can be made of.
///
/// The set of encodings is closed; this trait is sealed.
pub trait Pixel:
    Copy + PartialEq + core::fmt::Debug + Send + Sync + Pod + sealed::Sealed + 'static
{
    /// Whether the encoding stores alpha.
    const HAS_ALPHA: bool;

    /// Unpack to the linear working color. Encodings without alpha report
    /// an opaque color.
    fn to_rgba(self) -> Rgba;

    /// Pack from the linear working color.
    fn from_rgba(c: Rgba) -> Self;
}

// ============================================================================
// Encodings
// ============================================================================

/// RGBA, 8 bits per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl sealed::Sealed for Rgba8 {}

impl Pixel for Rgba8 {
    const HAS_ALPHA: bool = true;

    fn to_rgba(self) -> Rgba {
        Rgba::new(
            unpack_u8(self.r),
            unpack_u8(self.g),
            unpack_u8(self.b),
            unpack_u8(self.a),
        )
    }

    fn from_rgba(c: Rgba) -> Self {
        Self::new(pack_u8(c.r), pack_u8(c.g), pack_u8(c.b), pack_u8(c.a))
    }
}

/// BGRA, 8 bits per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Bgra8 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }
}

impl sealed::Sealed for Bgra8 {}

impl Pixel for Bgra8 {
    const HAS_ALPHA: bool = true;

    fn to_rgba(self) -> Rgba {
        Rgba::new(
            unpack_u8(self.r),
            unpack_u8(self.g),
            unpack_u8(self.b),
            unpack_u8(self.a),
        )
    }

    fn from_rgba(c: Rgba) -> Self {
        Self::new(pack_u8(c.r), pack_u8(c.g), pack_u8(c.b), pack_u8(c.a))
    }
}

/// RGB, 8 bits per channel, always opaque.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl sealed::Sealed for Rgb8 {}

impl Pixel for Rgb8 {
    const HAS_ALPHA: bool = false;

    fn to_rgba(self) -> Rgba {
        Rgba::new_rgb(unpack_u8(self.r), unpack_u8(self.g), unpack_u8(self.b))
    }

    fn from_rgba(c: Rgba) -> Self {
        Self::new(pack_u8(c.r), pack_u8(c.g), pack_u8(c.b))
    }
}

/// 8-bit luminance plus alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Gray8 {
    pub v: u8,
    pub a: u8,
}

impl Gray8 {
    pub const fn new(v: u8, a: u8) -> Self {
        Self { v, a }
    }
}

impl sealed::Sealed for Gray8 {}

impl Pixel for Gray8 {
    const HAS_ALPHA: bool = true;

    fn to_rgba(self) -> Rgba {
        let v = unpack_u8(self.v);
        Rgba::new(v, v, v, unpack_u8(self.a))
    }

    fn from_rgba(c: Rgba) -> Self {
        Self::new(pack_u8(c.luminance()), pack_u8(c.a))
    }
}

/// 16-bit luminance plus alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Gray16 {
    pub v: u16,
    pub a: u16,
}

impl Gray16 {
    pub const fn new(v: u16, a: u16) -> Self {
        Self { v, a }
    }
}

impl sealed::Sealed for Gray16 {}

impl Pixel for Gray16 {
    const HAS_ALPHA: bool = true;

    fn to_rgba(self) -> Rgba {
        let v = unpack_u16(self.v);
        Rgba::new(v, v, v, unpack_u16(self.a))
    }

    fn from_rgba(c: Rgba) -> Self {
        Self::new(pack_u16(c.luminance()), pack_u16(c.a))
    }
}

/// RGBA, 16 bits per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba16 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Rgba16 {
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }
}

impl sealed::Sealed for Rgba16 {}

impl Pixel for Rgba16 {
    const HAS_ALPHA: bool = true;

    fn to_rgba(self) -> Rgba {
        Rgba::new(
            unpack_u16(self.r),
            unpack_u16(self.g),
            unpack_u16(self.b),
            unpack_u16(self.a),
        )
    }

    fn from_rgba(c: Rgba) -> Self {
        Self::new(pack_u16(c.r), pack_u16(c.g), pack_u16(c.b), pack_u16(c.a))
    }
}

/// RGBA, f32 per channel, clamped to [0, 1] on store.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct RgbaF32 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RgbaF32 {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl sealed::Sealed for RgbaF32 {}

impl Pixel for RgbaF32 {
    const HAS_ALPHA: bool = true;

    fn to_rgba(self) -> Rgba {
        Rgba::new(self.r as f64, self.g as f64, self.b as f64, self.a as f64)
    }

    fn from_rgba(c: Rgba) -> Self {
        let c = c.clamped();
        Self::new(c.r as f32, c.g as f32, c.b as f32, c.a as f32)
    }
}

// ============================================================================
// Tests
// ============================================================================
