//! Foundation types shared by every stage of the drawing pipeline.
//!
//! Points and rectangles in device space.

use core::ops::{Add, Sub};

// ============================================================================
// Mathematical constants
// ============================================================================

pub const PI: f64 = core::f64::consts::PI;

// ============================================================================
// Point
// ============================================================================

/// A 2D point (or vector) in device space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (no NaN, no infinity).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn distance(self, other: PointD) -> f64 {
        (other - self).length()
    }

    /// Midpoint of `self` and `other`.
    #[inline]
    pub fn mid(self, other: PointD) -> PointD {
        PointD::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Linear interpolation toward `other` by `t`.
    #[inline]
    pub fn lerp(self, other: PointD, t: f64) -> PointD {
        PointD::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for PointD {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointD {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Grow the rectangle so it also covers the point (x, y).
    pub fn include(&mut self, x: T, y: T) {
        if x < self.x1 {
            self.x1 = x;
        }
        if y < self.y1 {
            self.y1 = y;
        }
        if x > self.x2 {
            self.x2 = x;
        }
        if y > self.y2 {
            self.y2 = y;
        }
    }

    /// Returns `true` if this rectangle overlaps with `r`.
    pub fn overlaps(&self, r: &Self) -> bool {
        !(r.x1 > self.x2 || r.x2 < self.x1 || r.y1 > self.y2 || r.y2 < self.y1)
    }
}

/// Rectangle with `f64` coordinates.
pub type RectD = Rect<f64>;

impl RectD {
    /// Degenerate rectangle at a single point.
    pub fn from_point(p: PointD) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

// ============================================================================
// Tests
// ============================================================================
