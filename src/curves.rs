//! Curve flattening.
//!
//! Converts [`Segment`]s into polylines by adaptive de Casteljau
//! subdivision. A curve piece is accepted once every control point lies
//! within the tolerance of the chord joining its end points; because a
//! Bezier lies inside the hull of its control points, the emitted chord is
//! then within tolerance of the curve itself.
//!
//! Subdivision runs on an explicit worklist and stops at
//! [`MAX_SUBDIVISION_DEPTH`] levels.

use log::{trace, warn};
use smallvec::SmallVec;

use crate::basics::PointD;
use crate::math::calc_segment_point_sq_distance;
use crate::path::{Segment, SubPath};

/// Hard cap on subdivision levels for a single curve.
pub const MAX_SUBDIVISION_DEPTH: u32 = 16;

// ============================================================================
// Curve pieces
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Piece {
    Quad([PointD; 3]),
    Cubic([PointD; 4]),
}

impl Piece {
    fn end(&self) -> PointD {
        match self {
            Piece::Quad(p) => p[2],
            Piece::Cubic(p) => p[3],
        }
    }

    /// Largest squared distance between a control point and the chord.
    fn sq_deviation(&self) -> f64 {
        match self {
            Piece::Quad([p0, p1, p2]) => calc_segment_point_sq_distance(*p0, *p2, *p1),
            Piece::Cubic([p0, p1, p2, p3]) => calc_segment_point_sq_distance(*p0, *p3, *p1)
                .max(calc_segment_point_sq_distance(*p0, *p3, *p2)),
        }
    }

    /// Split at t = 0.5.
    fn split(&self) -> (Piece, Piece) {
        match *self {
            Piece::Quad([p0, p1, p2]) => {
                let p01 = p0.mid(p1);
                let p12 = p1.mid(p2);
                let m = p01.mid(p12);
                (Piece::Quad([p0, p01, m]), Piece::Quad([m, p12, p2]))
            }
            Piece::Cubic([p0, p1, p2, p3]) => {
                let p01 = p0.mid(p1);
                let p12 = p1.mid(p2);
                let p23 = p2.mid(p3);
                let p012 = p01.mid(p12);
                let p123 = p12.mid(p23);
                let m = p012.mid(p123);
                (
                    Piece::Cubic([p0, p01, p012, m]),
                    Piece::Cubic([m, p123, p23, p3]),
                )
            }
        }
    }
}

// ============================================================================
// Flattening
// ============================================================================

/// Flatten a segment into a polyline whose deviation from the segment is at
/// most `tolerance`.
///
/// Lines yield their two end points. The first point is always the segment
/// start and the last point the segment end. The result depends only on the
/// segment and the tolerance.
pub fn flatten(segment: &Segment, tolerance: f64) -> Vec<PointD> {
    let mut points = Vec::new();
    points.push(segment.start());
    flatten_into(segment, tolerance, &mut points);
    points
}

/// Append the flattened segment to `out`, without its start point.
pub fn flatten_into(segment: &Segment, tolerance: f64, out: &mut Vec<PointD>) {
    let piece = match *segment {
        Segment::Line { end, .. } => {
            out.push(end);
            return;
        }
        Segment::Quadratic {
            start,
            control,
            end,
        } => Piece::Quad([start, control, end]),
        Segment::Cubic {
            start,
            control1,
            control2,
            end,
        } => Piece::Cubic([start, control1, control2, end]),
    };

    let tolerance_sq = tolerance * tolerance;
    let mut depth_capped = false;
    let mut work: SmallVec<[(Piece, u32); 32]> = SmallVec::new();
    work.push((piece, 0));

    while let Some((piece, depth)) = work.pop() {
        if piece.sq_deviation() <= tolerance_sq {
            out.push(piece.end());
            continue;
        }
        if depth >= MAX_SUBDIVISION_DEPTH {
            depth_capped = true;
            out.push(piece.end());
            continue;
        }
        let (first, second) = piece.split();
        // Second half first so the first half is popped next.
        work.push((second, depth + 1));
        work.push((first, depth + 1));
    }

    if depth_capped {
        warn!("curve flattening hit the subdivision depth cap of {MAX_SUBDIVISION_DEPTH}");
    }
}

// ============================================================================
// FlattenedContour
// ============================================================================

/// A subpath approximated by straight edges.
///
/// For closed contours the repeated closing point is dropped, so `points`
/// holds each polygon vertex once and the closing edge is implicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattenedContour {
    pub points: Vec<PointD>,
    pub closed: bool,
}

impl FlattenedContour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges as point pairs, including the closing edge when `close` is set.
    pub fn edges(&self, close: bool) -> impl Iterator<Item = (PointD, PointD)> + '_ {
        let closing = match (close, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 1 => Some((last, first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }
}

/// Flatten every segment of a subpath.
pub fn flatten_subpath(subpath: &SubPath, tolerance: f64) -> FlattenedContour {
    let mut points = Vec::new();
    if let Some(start) = subpath.start_point() {
        points.push(start);
    }
    for segment in subpath.segments() {
        flatten_into(segment, tolerance, &mut points);
    }
    let closed = subpath.is_closed();
    if closed && points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    trace!(
        "flattened {} segments into {} points",
        subpath.segments().len(),
        points.len()
    );
    FlattenedContour { points, closed }
}

// ============================================================================
// Tests
// ============================================================================
