//! Pixel buffer: owned, row-major storage of one pixel encoding.
//!
//! [`ImageBuffer`] is the destination of every draw call; [`Region`] names
//! the sub-rectangle a call may touch.

use crate::color::Pixel;
use crate::error::{DrawError, Result};

// ============================================================================
// Region
// ============================================================================

/// Axis-aligned pixel rectangle covering columns `x..x + width` and rows
/// `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the last column, widened so it cannot overflow.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// One past the last row, widened so it cannot overflow.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && (x as u64) < self.right() && y >= self.y && (y as u64) < self.bottom()
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_region(&self, other: &Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

// ============================================================================
// ImageBuffer
// ============================================================================

/// A `width` × `height` grid of pixels stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer<P: Pixel> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

impl<P: Pixel> ImageBuffer<P> {
    /// A buffer with every pixel set to `fill`.
    pub fn new(width: u32, height: u32, fill: P) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Wrap existing pixels; `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<P>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DrawError::geometry(format!(
                "{} pixels supplied for a {width}x{height} buffer",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole buffer as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// Error unless `region` lies inside the buffer.
    pub fn check_region(&self, region: Region) -> Result<()> {
        if self.bounds().contains_region(&region) {
            Ok(())
        } else {
            Err(DrawError::OutOfBounds {
                region,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<P> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
        self.index(x, y).map(|i| &mut self.pixels[i])
    }

    /// Store `p` at `(x, y)`; returns false when outside the buffer.
    pub fn set(&mut self, x: u32, y: u32, p: P) -> bool {
        match self.pixel_mut(x, y) {
            Some(slot) => {
                *slot = p;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: u32) -> &[P] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [P] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.pixels[start..start + w]
    }

    /// Mutable row slices restricted to the columns and rows of `region`,
    /// paired with their row index. `region` must be inside the buffer.
    pub(crate) fn region_rows_mut(&mut self, region: Region) -> Vec<(u32, &mut [P])> {
        if region.is_empty() {
            return Vec::new();
        }
        let w = self.width as usize;
        let x0 = region.x as usize;
        let x1 = x0 + region.width as usize;
        self.pixels
            .chunks_exact_mut(w)
            .enumerate()
            .skip(region.y as usize)
            .take(region.height as usize)
            .map(|(y, row)| (y as u32, &mut row[x0..x1]))
            .collect()
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn fill(&mut self, p: P) {
        self.pixels.fill(p);
    }

    /// Raw bytes of the pixel data, row by row.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }
}

// ============================================================================
// Tests
// ============================================================================
