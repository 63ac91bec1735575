//! Brushes: the color source of a fill.
//!
//! A brush maps an integer pixel coordinate to a color. Sampling is pure and
//! `Brush` is `Sync`, so rows can be sampled from several threads at once.

use crate::color::Rgba;
use crate::error::{DrawError, Result};

// ============================================================================
// Brush
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    /// The same color everywhere.
    Solid(Rgba),
    /// A two-color tile repeated over the image.
    Pattern(PatternBrush),
}

impl Brush {
    pub fn solid(color: Rgba) -> Self {
        Brush::Solid(color)
    }

    /// Color at pixel `(x, y)`.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> Rgba {
        match self {
            Brush::Solid(c) => *c,
            Brush::Pattern(p) => p.sample(x, y),
        }
    }
}

impl From<Rgba> for Brush {
    fn from(c: Rgba) -> Self {
        Brush::Solid(c)
    }
}

impl From<PatternBrush> for Brush {
    fn from(p: PatternBrush) -> Self {
        Brush::Pattern(p)
    }
}

// ============================================================================
// PatternBrush
// ============================================================================

/// Foreground where the tile cell is set, background elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternBrush {
    foreground: Rgba,
    background: Rgba,
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

const T: bool = true;
const F: bool = false;

impl PatternBrush {
    /// Build from tile rows, top to bottom. Every row must have the same
    /// non-zero length.
    pub fn new(foreground: Rgba, background: Rgba, tile: &[&[bool]]) -> Result<Self> {
        let cols = tile.first().map_or(0, |r| r.len());
        if cols == 0 {
            return Err(DrawError::options("pattern tile is empty"));
        }
        if let Some(i) = tile.iter().position(|r| r.len() != cols) {
            return Err(DrawError::options(format!(
                "pattern tile row {i} has {} cells, expected {cols}",
                tile[i].len()
            )));
        }
        Ok(Self {
            foreground,
            background,
            rows: tile.len(),
            cols,
            cells: tile.iter().flat_map(|r| r.iter().copied()).collect(),
        })
    }

    fn preset<const R: usize, const C: usize>(
        foreground: Rgba,
        background: Rgba,
        tile: [[bool; C]; R],
    ) -> Self {
        Self {
            foreground,
            background,
            rows: R,
            cols: C,
            cells: tile.iter().flatten().copied().collect(),
        }
    }

    /// One pixel in ten (approximately) set.
    pub fn percent10(foreground: Rgba, background: Rgba) -> Self {
        Self::preset(
            foreground,
            background,
            [[T, F, F, F], [F, F, F, F], [F, F, T, F], [F, F, F, F]],
        )
    }

    /// One pixel in five (approximately) set.
    pub fn percent20(foreground: Rgba, background: Rgba) -> Self {
        Self::preset(
            foreground,
            background,
            [[T, F, F, F], [F, F, T, F], [T, F, F, F], [F, F, T, F]],
        )
    }

    pub fn horizontal(foreground: Rgba, background: Rgba) -> Self {
        Self::preset(foreground, background, [[F], [T], [F], [F]])
    }

    pub fn vertical(foreground: Rgba, background: Rgba) -> Self {
        Self::preset(foreground, background, [[F, T, F, F]])
    }

    pub fn forward_diagonal(foreground: Rgba, background: Rgba) -> Self {
        Self::preset(
            foreground,
            background,
            [[F, F, F, T], [F, F, T, F], [F, T, F, F], [T, F, F, F]],
        )
    }

    pub fn backward_diagonal(foreground: Rgba, background: Rgba) -> Self {
        Self::preset(
            foreground,
            background,
            [[T, F, F, F], [F, T, F, F], [F, F, T, F], [F, F, F, T]],
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Color at pixel `(x, y)`; the tile repeats in both directions,
    /// negative coordinates included.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> Rgba {
        let row = (y as i64).rem_euclid(self.rows as i64) as usize;
        let col = (x as i64).rem_euclid(self.cols as i64) as usize;
        if self.cells[row * self.cols + col] {
            self.foreground
        } else {
            self.background
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
