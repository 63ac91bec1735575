//! Drawing entry points.
//!
//! [`fill_region`] and [`stroke_path`] validate all of their inputs, then
//! rasterize the shape and composite the brush into the target region of the
//! buffer. Nothing is written until validation has passed, so a call that
//! returns `Err` leaves the buffer untouched.
//!
//! Rows are processed in bands. Each band gets its own [`SweepState`] over
//! the shared edge table, so with the `multithreading` feature bands run in
//! parallel on the rayon pool; the output is identical either way.

use log::debug;
#[cfg(feature = "multithreading")]
use rayon::prelude::*;

use crate::brush::Brush;
use crate::color::Pixel;
use crate::compositor::{blend, BlendMode};
use crate::error::Result;
use crate::options::GraphicsOptions;
use crate::path::Path;
use crate::pixel_buffer::{ImageBuffer, Region};
use crate::rasterizer::{CoverageSpan, Rasterizer, SweepState};
use crate::stroke::{stroke_unchecked, StrokeStyle};

/// Rows handed to one worker at a time.
const BAND_ROWS: usize = 16;

/// Fill the interior of `path` (non-zero rule, every subpath implicitly
/// closed) with `brush`, touching only pixels inside `region`.
pub fn fill_region<P: Pixel>(
    buffer: &mut ImageBuffer<P>,
    region: Region,
    path: &Path,
    brush: &Brush,
    options: &GraphicsOptions,
) -> Result<()> {
    options.validate()?;
    buffer.check_region(region)?;
    path.validate()?;

    render_path(buffer, region, path, brush, options);
    Ok(())
}

/// Stroke `path` with `style` and fill the resulting outline with `brush`,
/// touching only pixels inside `region`.
pub fn stroke_path<P: Pixel>(
    buffer: &mut ImageBuffer<P>,
    region: Region,
    path: &Path,
    style: &StrokeStyle,
    brush: &Brush,
    options: &GraphicsOptions,
) -> Result<()> {
    options.validate()?;
    buffer.check_region(region)?;
    path.validate()?;
    let dash = style.dash_pattern()?;

    let outline = stroke_unchecked(path, style, dash.as_ref(), options.tolerance);
    render_path(buffer, region, &outline.as_path(), brush, options);
    Ok(())
}

fn render_path<P: Pixel>(
    buffer: &mut ImageBuffer<P>,
    region: Region,
    path: &Path,
    brush: &Brush,
    options: &GraphicsOptions,
) {
    if region.is_empty() {
        return;
    }
    let rasterizer = Rasterizer::new(path, options, region);
    let rows = rasterizer.rows();
    debug!(
        "rendering {} edges over rows {:?} of region {:?}",
        rasterizer.edge_table().edges().len(),
        rows,
        region
    );
    if rows.is_empty() {
        return;
    }

    let band_region = Region::new(region.x, rows.start, region.width, rows.end - rows.start);
    let mut rows = buffer.region_rows_mut(band_region);
    let renderer = BandRenderer {
        rasterizer: &rasterizer,
        brush,
        mode: options.blend_mode(),
        blend_percentage: options.blend_percentage,
        x_offset: region.x,
    };

    #[cfg(feature = "multithreading")]
    rows.par_chunks_mut(BAND_ROWS)
        .for_each(|band| renderer.render(band));
    #[cfg(not(feature = "multithreading"))]
    rows.chunks_mut(BAND_ROWS)
        .for_each(|band| renderer.render(band));
}

/// Everything a worker needs to render a band of rows.
struct BandRenderer<'a> {
    rasterizer: &'a Rasterizer,
    brush: &'a Brush,
    mode: BlendMode,
    blend_percentage: f32,
    /// Buffer column of the first pixel in each row slice.
    x_offset: u32,
}

impl BandRenderer<'_> {
    fn render<P: Pixel>(&self, band: &mut [(u32, &mut [P])]) {
        let mut state: SweepState = self.rasterizer.new_state();
        let mut spans: Vec<CoverageSpan> = Vec::new();
        for (y, row) in band.iter_mut() {
            spans.clear();
            self.rasterizer.sweep_row(&mut state, *y, &mut spans);
            for span in &spans {
                self.blend_span(span, row);
            }
        }
    }

    #[inline]
    fn blend_span<P: Pixel>(&self, span: &CoverageSpan, row: &mut [P]) {
        let amount = span.coverage * self.blend_percentage;
        let start = (span.x_start - self.x_offset) as usize;
        let end = (span.x_end - self.x_offset) as usize;
        let y = span.row as i32;
        for (x, px) in (span.x_start..).zip(&mut row[start..end]) {
            *px = blend(*px, self.brush.sample(x as i32, y), amount, self.mode);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
