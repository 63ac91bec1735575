//! Stroke math: cap, join, and miter calculations for stroked paths.
//!
//! Given a vertex and its neighbours, [`MathStroke`] emits the offset points
//! that make up one side of the pen outline at that vertex. The caller walks
//! a polyline forward for one side and backward for the other.

use crate::basics::{PointD, PI};
use crate::math::{calc_distance, calc_intersection, cross_product};
use crate::vertex_sequence::VertexDist;

/// Lower bound for the miter length ratio used on inner (concave) joins.
const INNER_MITER_LIMIT: f64 = 1.01;

/// Most points a round cap (half circle) may be split into.
pub const MAX_ARC_STEPS: u32 = 1024;

// ============================================================================
// Enums
// ============================================================================

/// Line cap style for open path endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Flat end exactly at the endpoint.
    Butt,
    /// Flat end extended by half the stroke width.
    Square,
    /// Half circle centred on the endpoint.
    Round,
}

/// Line join style at path corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner; falls back to bevel past the miter limit.
    Miter,
    /// Circular arc around the corner.
    Round,
    /// Straight chord across the corner.
    Bevel,
}

// ============================================================================
// MathStroke
// ============================================================================

/// Stroke geometry calculator.
///
/// Output vertices are pushed into a `Vec<PointD>` consumer, which is
/// cleared first.
#[derive(Debug, Clone)]
pub struct MathStroke {
    /// Half of the stroke width.
    width: f64,
    width_eps: f64,
    miter_limit: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    /// Angular step for arcs, derived from the flattening tolerance.
    arc_step: f64,
}

impl MathStroke {
    /// `width` is the full stroke width; `tolerance` bounds the deviation of
    /// round caps and joins from a true circle.
    pub fn new(
        width: f64,
        line_cap: LineCap,
        line_join: LineJoin,
        miter_limit: f64,
        tolerance: f64,
    ) -> Self {
        let half = width * 0.5;
        Self {
            width: half,
            width_eps: half / 1024.0,
            miter_limit,
            line_cap,
            line_join,
            arc_step: arc_step(half, tolerance),
        }
    }

    pub fn width(&self) -> f64 {
        self.width * 2.0
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    /// Calculate cap vertices at a line endpoint.
    ///
    /// `v0` is the endpoint, `v1` is the adjacent vertex, `len` is the
    /// distance between them.
    pub fn calc_cap(&self, vc: &mut Vec<PointD>, v0: &VertexDist, v1: &VertexDist, len: f64) {
        vc.clear();

        let dx1 = (v1.y - v0.y) / len * self.width;
        let dy1 = (v1.x - v0.x) / len * self.width;

        if self.line_cap != LineCap::Round {
            let (dx2, dy2) = if self.line_cap == LineCap::Square {
                (dy1, dx1)
            } else {
                (0.0, 0.0)
            };
            vc.push(PointD::new(v0.x - dx1 - dx2, v0.y + dy1 - dy2));
            vc.push(PointD::new(v0.x + dx1 - dx2, v0.y - dy1 - dy2));
        } else {
            let n = (PI / self.arc_step) as i32;
            let da = PI / (n + 1) as f64;

            vc.push(PointD::new(v0.x - dx1, v0.y + dy1));
            let mut a1 = dy1.atan2(-dx1) + da;
            for _ in 0..n {
                vc.push(PointD::new(
                    v0.x + a1.cos() * self.width,
                    v0.y + a1.sin() * self.width,
                ));
                a1 += da;
            }
            vc.push(PointD::new(v0.x + dx1, v0.y - dy1));
        }
    }

    /// Calculate join vertices at the junction of two line segments.
    ///
    /// `v0`→`v1` is the first segment, `v1`→`v2` is the second.
    /// `len1` and `len2` are the segment lengths.
    pub fn calc_join(
        &self,
        vc: &mut Vec<PointD>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        len1: f64,
        len2: f64,
    ) {
        let d1 = PointD::new(
            self.width * (v1.y - v0.y) / len1,
            self.width * (v1.x - v0.x) / len1,
        );
        let d2 = PointD::new(
            self.width * (v2.y - v1.y) / len2,
            self.width * (v2.x - v1.x) / len2,
        );

        vc.clear();

        let cp = cross_product(v0.point(), v1.point(), v2.point());
        if cp > 0.0 {
            // Inner join
            let limit = (len1.min(len2) / self.width).max(INNER_MITER_LIMIT);
            self.calc_miter(vc, v0, v1, v2, d1, d2, limit);
            return;
        }

        // Outer join
        let dx = (d1.x + d2.x) / 2.0;
        let dy = (d1.y + d2.y) / 2.0;
        let dbevel = (dx * dx + dy * dy).sqrt();

        if self.line_join != LineJoin::Miter && self.width - dbevel < self.width_eps {
            // The corner is so shallow that any join collapses to one point.
            let p = calc_intersection(
                offset(v0, d1),
                offset(v1, d1),
                offset(v1, d2),
                offset(v2, d2),
            )
            .unwrap_or_else(|| offset(v1, d1));
            vc.push(p);
            return;
        }

        match self.line_join {
            LineJoin::Miter => self.calc_miter(vc, v0, v1, v2, d1, d2, self.miter_limit),
            LineJoin::Round => {
                self.calc_arc(vc, v1.point(), PointD::new(d1.x, -d1.y), PointD::new(d2.x, -d2.y))
            }
            LineJoin::Bevel => {
                vc.push(offset(v1, d1));
                vc.push(offset(v1, d2));
            }
        }
    }

    /// Arc around `center` from `center + d1` to `center + d2`, clockwise
    /// in y-down space.
    fn calc_arc(&self, vc: &mut Vec<PointD>, center: PointD, d1: PointD, d2: PointD) {
        let mut a1 = d1.y.atan2(d1.x);
        let mut a2 = d2.y.atan2(d2.x);
        if a1 > a2 {
            a2 += 2.0 * PI;
        }
        let n = ((a2 - a1) / self.arc_step) as i32;
        let da = (a2 - a1) / (n + 1) as f64;

        vc.push(center + d1);
        a1 += da;
        for _ in 0..n {
            vc.push(PointD::new(
                center.x + a1.cos() * self.width,
                center.y + a1.sin() * self.width,
            ));
            a1 += da;
        }
        vc.push(center + d2);
    }

    /// Miter join: the intersection of the two offset lines when it lies
    /// within `limit` half-widths of the vertex, otherwise a bevel.
    #[allow(clippy::too_many_arguments)]
    fn calc_miter(
        &self,
        vc: &mut Vec<PointD>,
        v0: &VertexDist,
        v1: &VertexDist,
        v2: &VertexDist,
        d1: PointD,
        d2: PointD,
        limit: f64,
    ) {
        let lim = self.width * limit;

        match calc_intersection(offset(v0, d1), offset(v1, d1), offset(v1, d2), offset(v2, d2)) {
            Some(xi) => {
                if calc_distance(v1.point(), xi) <= lim {
                    vc.push(xi);
                    return;
                }
            }
            None => {
                // Parallel offsets: either a straight continuation (one point
                // suffices) or a full reversal (needs the bevel).
                let p = offset(v1, d1);
                if (cross_product(v0.point(), v1.point(), p) < 0.0)
                    == (cross_product(v1.point(), v2.point(), p) < 0.0)
                {
                    vc.push(p);
                    return;
                }
            }
        }

        vc.push(offset(v1, d1));
        vc.push(offset(v1, d2));
    }
}

/// The vertex shifted by the left-hand normal `d` (stored as (dy, dx)).
#[inline]
fn offset(v: &VertexDist, d: PointD) -> PointD {
    PointD::new(v.x + d.x, v.y - d.y)
}

/// Angular step that keeps an arc of radius `radius` within `tolerance` of
/// the true circle, never finer than [`MAX_ARC_STEPS`] per half circle.
pub fn arc_step(radius: f64, tolerance: f64) -> f64 {
    let step = (radius / (radius + tolerance)).acos() * 2.0;
    step.max(PI / MAX_ARC_STEPS as f64)
}

// ============================================================================
// Tests
// ============================================================================
