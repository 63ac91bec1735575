//! Scan rasterizer: converts a closed path into per-pixel coverage.
//!
//! The path is flattened into an [`EdgeTable`] of non-horizontal edges
//! sorted by their top. Each pixel row is then sampled on N evenly spaced
//! sub-scanlines; on every sub-scanline the crossings of the active edges
//! are sorted and walked with the non-zero winding rule, and the exact
//! horizontal overlap of each inside interval with each pixel is added to
//! that pixel. Dividing by N gives the coverage.
//!
//! The edge table is read-only once built. All mutable sweep state lives in
//! a [`SweepState`], so independent row bands can be swept concurrently,
//! each with its own state, and produce the same result as one sequential
//! sweep.
//!
//! Sampling conventions:
//! - sub-scanline `k` of row `y` samples at `y + (k + 0.5) / N`
//! - an edge is crossed at sample `sy` iff `y_top <= sy < y_bottom`
//! - without antialiasing one sample at the row centre is taken and a pixel
//!   is inside iff its centre `x + 0.5` lies in an inside interval `[x0, x1)`

use core::ops::Range;

use log::debug;

use crate::basics::{PointD, RectD};
use crate::curves::flatten_subpath;
use crate::error::{DrawError, Result};
use crate::options::GraphicsOptions;
use crate::path::Path;
use crate::pixel_buffer::Region;

// ============================================================================
// Edges
// ============================================================================

/// A non-horizontal line segment oriented top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x_top: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    /// Change in x per unit of y.
    pub dxdy: f64,
    /// +1 when the original segment runs downward, -1 when upward.
    pub winding: i32,
}

impl Edge {
    /// `None` for horizontal segments, which never cross a sample line.
    pub fn new(p0: PointD, p1: PointD) -> Option<Self> {
        if p0.y == p1.y {
            return None;
        }
        let (top, bottom, winding) = if p0.y < p1.y {
            (p0, p1, 1)
        } else {
            (p1, p0, -1)
        };
        Some(Self {
            x_top: top.x,
            y_top: top.y,
            y_bottom: bottom.y,
            dxdy: (bottom.x - top.x) / (bottom.y - top.y),
            winding,
        })
    }

    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        self.x_top + (y - self.y_top) * self.dxdy
    }
}

/// All edges of a path, sorted by `y_top`.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    y_min: f64,
    y_max: f64,
}

impl EdgeTable {
    /// Flatten every subpath of `path` and collect its edges. Every contour
    /// is treated as closed for filling.
    pub fn new(path: &Path, tolerance: f64) -> Self {
        let mut edges = Vec::new();
        for subpath in path.subpaths() {
            let contour = flatten_subpath(subpath, tolerance);
            edges.extend(contour.edges(true).filter_map(|(a, b)| Edge::new(a, b)));
        }
        Self::from_edges(edges)
    }

    pub fn from_edges(mut edges: Vec<Edge>) -> Self {
        edges.sort_by(|a, b| {
            a.y_top
                .total_cmp(&b.y_top)
                .then(a.x_top.total_cmp(&b.x_top))
        });
        let y_min = edges.first().map_or(0.0, |e| e.y_top);
        let y_max = edges.iter().map(|e| e.y_bottom).fold(y_min, f64::max);
        Self {
            edges,
            y_min,
            y_max,
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Vertical extent `[y_min, y_max)` of all edges.
    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }
}

// ============================================================================
// Spans
// ============================================================================

/// A run of pixels in one row sharing the same non-zero coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSpan {
    pub row: u32,
    /// First column of the run.
    pub x_start: u32,
    /// One past the last column of the run.
    pub x_end: u32,
    /// Coverage in (0, 1].
    pub coverage: f32,
}

impl CoverageSpan {
    pub fn len(&self) -> u32 {
        self.x_end - self.x_start
    }

    pub fn is_empty(&self) -> bool {
        self.x_end <= self.x_start
    }
}

// ============================================================================
// Sweep state
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Crossing {
    x: f64,
    winding: i32,
}

/// Mutable per-sweep data: the active edge set and the coverage row being
/// accumulated. One state serves any increasing sequence of rows.
#[derive(Debug, Clone)]
pub struct SweepState {
    next_edge: usize,
    active: Vec<usize>,
    crossings: Vec<Crossing>,
    /// Accumulated sample coverage per column of the clip region.
    cells: Vec<f32>,
    dirty: Option<(usize, usize)>,
    last_sample: f64,
}

impl SweepState {
    fn new(width: usize) -> Self {
        Self {
            next_edge: 0,
            active: Vec::new(),
            crossings: Vec::new(),
            cells: vec![0.0; width],
            dirty: None,
            last_sample: f64::NEG_INFINITY,
        }
    }

    #[inline]
    fn touch(&mut self, lo: usize, hi: usize) {
        self.dirty = Some(match self.dirty {
            Some((a, b)) => (a.min(lo), b.max(hi)),
            None => (lo, hi),
        });
    }
}

// ============================================================================
// Rasterizer
// ============================================================================

/// A path prepared for sweeping against one clip region.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    table: EdgeTable,
    clip: Region,
    samples: u32,
    antialias: bool,
}

impl Rasterizer {
    /// Build the edge table for `path`. The inputs are assumed validated,
    /// with `clip` ending within the `u32` coordinate range.
    pub fn new(path: &Path, options: &GraphicsOptions, clip: Region) -> Self {
        let clip_box = RectD::new(
            clip.x as f64,
            clip.y as f64,
            clip.right() as f64,
            clip.bottom() as f64,
        );
        let visible = !clip.is_empty()
            && path
                .bounding_box()
                .is_some_and(|bb| bb.overlaps(&clip_box));
        let table = if visible {
            EdgeTable::new(path, options.tolerance)
        } else {
            EdgeTable::default()
        };
        Self {
            table,
            clip,
            samples: options.effective_samples().max(1),
            antialias: options.antialias,
        }
    }

    pub fn edge_table(&self) -> &EdgeTable {
        &self.table
    }

    pub fn clip(&self) -> Region {
        self.clip
    }

    /// Rows of the clip region that can receive coverage.
    pub fn rows(&self) -> Range<u32> {
        if self.table.is_empty() || self.clip.is_empty() {
            return 0..0;
        }
        let (y_min, y_max) = self.table.y_range();
        let first = (y_min.floor().max(self.clip.y as f64)) as u64;
        let last = (y_max.ceil().min(self.clip.bottom() as f64)).max(0.0) as u64;
        if first >= last {
            return 0..0;
        }
        first as u32..last as u32
    }

    /// Fresh sweep state for this rasterizer.
    pub fn new_state(&self) -> SweepState {
        SweepState::new(self.clip.width as usize)
    }

    /// Append the spans of row `y` to `out`. Rows swept with the same state
    /// must be strictly increasing.
    pub fn sweep_row(&self, state: &mut SweepState, y: u32, out: &mut Vec<CoverageSpan>) {
        let n = self.samples;
        for k in 0..n {
            let sy = y as f64 + (k as f64 + 0.5) / n as f64;
            self.sample_line(state, sy);
        }
        self.emit_row(state, y, out);
    }

    /// Sweep every row sequentially.
    pub fn spans(&self) -> Vec<CoverageSpan> {
        let mut state = self.new_state();
        let mut out = Vec::new();
        for y in self.rows() {
            self.sweep_row(&mut state, y, &mut out);
        }
        out
    }

    fn sample_line(&self, state: &mut SweepState, sy: f64) {
        debug_assert!(sy > state.last_sample, "sample lines must increase");
        state.last_sample = sy;

        let edges = self.table.edges();
        while state.next_edge < edges.len() && edges[state.next_edge].y_top <= sy {
            state.active.push(state.next_edge);
            state.next_edge += 1;
        }
        state.active.retain(|&i| edges[i].y_bottom > sy);
        if state.active.is_empty() {
            return;
        }

        state.crossings.clear();
        state.crossings.extend(state.active.iter().map(|&i| Crossing {
            x: edges[i].x_at(sy),
            winding: edges[i].winding,
        }));
        state
            .crossings
            .sort_by(|a, b| a.x.total_cmp(&b.x).then(a.winding.cmp(&b.winding)));

        // Walk the crossings with the non-zero rule. Crossings sharing an x
        // are applied together so abutting intervals merge.
        let mut winding = 0;
        let mut start = 0.0;
        let mut i = 0;
        let count = state.crossings.len();
        while i < count {
            let x = state.crossings[i].x;
            let was_inside = winding != 0;
            while i < count && state.crossings[i].x == x {
                winding += state.crossings[i].winding;
                i += 1;
            }
            let inside = winding != 0;
            if !was_inside && inside {
                start = x;
            } else if was_inside && !inside {
                self.accumulate(state, start, x);
            }
        }
    }

    /// Add the interval `[x0, x1)` of one sample line to the coverage row.
    fn accumulate(&self, state: &mut SweepState, x0: f64, x1: f64) {
        let lo = self.clip.x as f64;
        let hi = self.clip.right() as f64;
        let x0 = x0.max(lo);
        let x1 = x1.min(hi);
        if x0 >= x1 {
            return;
        }

        if !self.antialias {
            let first = (x0 - 0.5).ceil();
            let end = (x1 - 0.5).ceil();
            if first >= end {
                return;
            }
            let a = (first - lo) as usize;
            let b = (end - lo) as usize;
            for cell in &mut state.cells[a..b] {
                *cell += 1.0;
            }
            state.touch(a, b);
            return;
        }

        let first = x0.floor();
        let last = x1.ceil() - 1.0;
        let a = (first - lo) as usize;
        let b = (last - lo) as usize;
        if a == b {
            state.cells[a] += (x1 - x0) as f32;
        } else {
            state.cells[a] += (first + 1.0 - x0) as f32;
            for cell in &mut state.cells[a + 1..b] {
                *cell += 1.0;
            }
            state.cells[b] += (x1 - last) as f32;
        }
        state.touch(a, b + 1);
    }

    /// Turn the accumulated row into spans and reset it.
    fn emit_row(&self, state: &mut SweepState, y: u32, out: &mut Vec<CoverageSpan>) {
        let Some((a, b)) = state.dirty.take() else {
            return;
        };
        let n = self.samples as f32;
        let mut current: Option<CoverageSpan> = None;
        for i in a..b {
            let coverage = (state.cells[i] / n).clamp(0.0, 1.0);
            state.cells[i] = 0.0;
            let x = self.clip.x + i as u32;
            match current.as_mut() {
                Some(span) if span.coverage == coverage && span.x_end == x => {
                    span.x_end = x + 1;
                    continue;
                }
                _ => {}
            }
            if let Some(span) = current.take() {
                out.push(span);
            }
            if coverage > 0.0 {
                current = Some(CoverageSpan {
                    row: y,
                    x_start: x,
                    x_end: x + 1,
                    coverage,
                });
            }
        }
        if let Some(span) = current {
            out.push(span);
        }
    }
}

/// Coverage spans of `path` inside `clip`, sorted by row then column.
///
/// Validates `path`, `options` and `clip` first; `clip` must end within the
/// `u32` coordinate range. Every contour is implicitly closed.
pub fn fill(path: &Path, options: &GraphicsOptions, clip: Region) -> Result<Vec<CoverageSpan>> {
    options.validate()?;
    let addressable = Region::new(0, 0, u32::MAX, u32::MAX);
    if !addressable.contains_region(&clip) {
        return Err(DrawError::OutOfBounds {
            region: clip,
            width: u32::MAX,
            height: u32::MAX,
        });
    }
    path.validate()?;
    let rasterizer = Rasterizer::new(path, options, clip);
    let spans = rasterizer.spans();
    debug!(
        "rasterized {} edges into {} spans",
        rasterizer.edge_table().edges().len(),
        spans.len()
    );
    Ok(spans)
}

// ============================================================================
// Tests
// ============================================================================
