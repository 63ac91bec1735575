//! Stroker: converts a path plus a pen description into a fillable outline.
//!
//! Each subpath is flattened, optionally cut into dash fragments, and then
//! offset by half the stroke width on both sides. An open polyline becomes
//! one closed polygon (start cap, left side forward, end cap, right side
//! backward); a closed polyline becomes two closed loops (outer side
//! forward, inner side backward). Every polygon therefore turns the same
//! way relative to its direction of travel, so overlapping pieces of the
//! outline reinforce each other under the non-zero rule instead of
//! cancelling.

use log::trace;

use crate::basics::{PointD, PI};
use crate::curves::flatten_subpath;
use crate::dash::DashPattern;
use crate::error::{DrawError, Result};
use crate::math::calc_polygon_area;
use crate::math_stroke::{arc_step, LineCap, LineJoin, MathStroke};
use crate::path::{Path, SubPath};
use crate::vertex_sequence::VertexSequence;

/// Miter limit used by [`StrokeStyle::new`].
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

// ============================================================================
// StrokeStyle
// ============================================================================

/// Pen description for [`stroke`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Full stroke width in pixels; must be positive.
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    /// Maximum miter length as a multiple of half the width. Must be ≥ 1.
    pub miter_limit: f64,
    /// Alternating on/off lengths, starting with on. `None` draws solid.
    pub dash: Option<Vec<f64>>,
    /// Distance into the dash pattern at the start of every subpath.
    pub dash_offset: f64,
}

impl StrokeStyle {
    /// A solid pen with the default miter limit.
    pub fn new(width: f64, cap: LineCap, join: LineJoin) -> Self {
        Self {
            width,
            cap,
            join,
            miter_limit: DEFAULT_MITER_LIMIT,
            dash: None,
            dash_offset: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.dash_pattern().map(|_| ())
    }

    /// Validate the style and build its dash pattern, if any.
    pub(crate) fn dash_pattern(&self) -> Result<Option<DashPattern>> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(DrawError::geometry(format!(
                "stroke width must be positive and finite, got {}",
                self.width
            )));
        }
        if !self.miter_limit.is_finite() || self.miter_limit < 1.0 {
            return Err(DrawError::geometry(format!(
                "miter limit must be at least 1, got {}",
                self.miter_limit
            )));
        }
        self.dash
            .as_deref()
            .map(|dashes| DashPattern::new(dashes, self.dash_offset))
            .transpose()
    }
}

// ============================================================================
// Outline
// ============================================================================

/// The stroker's output: a path made of closed polygonal subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    polygons: Vec<Vec<PointD>>,
}

impl Outline {
    /// Each polygon lists its vertices once; the closing edge is implicit.
    pub fn polygons(&self) -> &[Vec<PointD>] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Sum of the signed areas of all polygons.
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(|p| calc_polygon_area(p)).sum()
    }

    /// The outline as a [`Path`] of closed line subpaths.
    pub fn as_path(&self) -> Path {
        Path::from_subpaths(self.polygons.iter().map(|p| SubPath::polygon(p)).collect())
    }

    fn push(&mut self, polygon: Vec<PointD>) {
        if polygon.len() >= 3 {
            self.polygons.push(polygon);
        }
    }
}

// ============================================================================
// Stroking
// ============================================================================

/// Stroke `path` with `style`, flattening curves to within `tolerance`.
///
/// Validates the path and the style first; zero-length subpaths are not
/// errors and produce the cap-dependent dot described on [`LineCap`].
pub fn stroke(path: &Path, style: &StrokeStyle, tolerance: f64) -> Result<Outline> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(DrawError::options(format!(
            "flattening tolerance must be positive and finite, got {tolerance}"
        )));
    }
    path.validate()?;
    let dash = style.dash_pattern()?;
    Ok(stroke_unchecked(path, style, dash.as_ref(), tolerance))
}

/// Stroke without validating; callers have already checked the inputs.
pub(crate) fn stroke_unchecked(
    path: &Path,
    style: &StrokeStyle,
    dash: Option<&DashPattern>,
    tolerance: f64,
) -> Outline {
    let mut gen = StrokeGenerator::new(style, tolerance);
    for subpath in path.subpaths() {
        if subpath.is_empty() {
            continue;
        }
        let contour = flatten_subpath(subpath, tolerance);
        match dash {
            Some(dash) => {
                for fragment in dash.split(&contour.points, contour.closed) {
                    gen.polyline(&fragment, false);
                }
            }
            None => gen.polyline(&contour.points, contour.closed),
        }
    }
    trace!(
        "stroked {} subpaths into {} polygons",
        path.subpaths().len(),
        gen.outline.polygons.len()
    );
    gen.outline
}

struct StrokeGenerator {
    math: MathStroke,
    half_width: f64,
    tolerance: f64,
    scratch: Vec<PointD>,
    outline: Outline,
}

impl StrokeGenerator {
    fn new(style: &StrokeStyle, tolerance: f64) -> Self {
        Self {
            math: MathStroke::new(style.width, style.cap, style.join, style.miter_limit, tolerance),
            half_width: style.width * 0.5,
            tolerance,
            scratch: Vec::new(),
            outline: Outline::default(),
        }
    }

    fn polyline(&mut self, points: &[PointD], closed: bool) {
        let seq = VertexSequence::new(points, closed);
        match seq.size() {
            0 => {}
            1 => self.dot(seq[0].point()),
            2 => self.open(&seq),
            _ if closed => self.closed(&seq),
            _ => self.open(&seq),
        }
    }

    fn open(&mut self, seq: &VertexSequence) {
        let n = seq.size();
        let mut polygon = Vec::new();

        self.math.calc_cap(&mut self.scratch, &seq[0], &seq[1], seq[0].dist);
        polygon.extend_from_slice(&self.scratch);
        for i in 1..n - 1 {
            self.math.calc_join(
                &mut self.scratch,
                &seq[i - 1],
                &seq[i],
                &seq[i + 1],
                seq[i - 1].dist,
                seq[i].dist,
            );
            polygon.extend_from_slice(&self.scratch);
        }

        self.math
            .calc_cap(&mut self.scratch, &seq[n - 1], &seq[n - 2], seq[n - 2].dist);
        polygon.extend_from_slice(&self.scratch);
        for i in (1..n - 1).rev() {
            self.math.calc_join(
                &mut self.scratch,
                &seq[i + 1],
                &seq[i],
                &seq[i - 1],
                seq[i].dist,
                seq[i - 1].dist,
            );
            polygon.extend_from_slice(&self.scratch);
        }

        self.outline.push(polygon);
    }

    fn closed(&mut self, seq: &VertexSequence) {
        let n = seq.size();

        let mut outer = Vec::new();
        for i in 0..n {
            let (prev, curr, next) = (seq.prev(i), seq.curr(i), seq.next(i));
            self.math
                .calc_join(&mut self.scratch, prev, curr, next, prev.dist, curr.dist);
            outer.extend_from_slice(&self.scratch);
        }
        self.outline.push(outer);

        let mut inner = Vec::new();
        for i in (0..n).rev() {
            let (prev, curr, next) = (seq.prev(i), seq.curr(i), seq.next(i));
            self.math
                .calc_join(&mut self.scratch, next, curr, prev, curr.dist, prev.dist);
            inner.extend_from_slice(&self.scratch);
        }
        self.outline.push(inner);
    }

    /// Zero-length subpath: a circle for round caps, an axis-aligned square
    /// for square caps, nothing for butt caps.
    fn dot(&mut self, center: PointD) {
        let r = self.half_width;
        match self.math.line_cap() {
            LineCap::Butt => {}
            LineCap::Square => self.outline.push(vec![
                PointD::new(center.x - r, center.y - r),
                PointD::new(center.x + r, center.y - r),
                PointD::new(center.x + r, center.y + r),
                PointD::new(center.x - r, center.y + r),
            ]),
            LineCap::Round => {
                let steps = ((2.0 * PI / arc_step(r, self.tolerance)).ceil() as usize).max(8);
                let da = 2.0 * PI / steps as f64;
                let circle = (0..steps)
                    .map(|i| {
                        let a = i as f64 * da;
                        PointD::new(center.x + a.cos() * r, center.y + a.sin() * r)
                    })
                    .collect();
                self.outline.push(circle);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
