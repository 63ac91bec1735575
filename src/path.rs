//! Path model: the immutable geometric input of a draw call.
//!
//! A [`Path`] is an ordered list of [`SubPath`]s; each subpath is a
//! continuous chain of [`Segment`]s (lines, quadratic and cubic Beziers)
//! flagged open or closed. The drawing core only reads paths.

use smallvec::SmallVec;

use crate::basics::{PointD, RectD};
use crate::error::{DrawError, Result};

/// Maximal gap tolerated between the end of one segment and the start of
/// the next before a subpath is considered disconnected.
pub const CONTINUITY_EPSILON: f64 = 1e-9;

// ============================================================================
// Segment
// ============================================================================

/// One piece of a contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        start: PointD,
        end: PointD,
    },
    Quadratic {
        start: PointD,
        control: PointD,
        end: PointD,
    },
    Cubic {
        start: PointD,
        control1: PointD,
        control2: PointD,
        end: PointD,
    },
}

impl Segment {
    pub fn line(start: PointD, end: PointD) -> Self {
        Segment::Line { start, end }
    }

    pub fn quadratic(start: PointD, control: PointD, end: PointD) -> Self {
        Segment::Quadratic {
            start,
            control,
            end,
        }
    }

    pub fn cubic(start: PointD, control1: PointD, control2: PointD, end: PointD) -> Self {
        Segment::Cubic {
            start,
            control1,
            control2,
            end,
        }
    }

    pub fn start(&self) -> PointD {
        match *self {
            Segment::Line { start, .. }
            | Segment::Quadratic { start, .. }
            | Segment::Cubic { start, .. } => start,
        }
    }

    pub fn end(&self) -> PointD {
        match *self {
            Segment::Line { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::Cubic { end, .. } => end,
        }
    }

    /// All defining points in order: start, controls, end.
    pub fn control_points(&self) -> SmallVec<[PointD; 4]> {
        match *self {
            Segment::Line { start, end } => SmallVec::from_slice(&[start, end]),
            Segment::Quadratic {
                start,
                control,
                end,
            } => SmallVec::from_slice(&[start, control, end]),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => SmallVec::from_slice(&[start, control1, control2, end]),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.control_points().iter().all(|p| p.is_finite())
    }
}

// ============================================================================
// SubPath
// ============================================================================

/// A continuous contour, open or closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPath {
    segments: Vec<Segment>,
    closed: bool,
}

impl SubPath {
    /// Build a subpath from raw parts. Continuity is not checked here;
    /// [`SubPath::validate`] reports violations.
    pub fn new(segments: Vec<Segment>, closed: bool) -> Self {
        Self { segments, closed }
    }

    /// A closed polygon through `points`; the closing edge is added if the
    /// last point differs from the first.
    pub fn polygon(points: &[PointD]) -> Self {
        let mut segments: Vec<Segment> = points
            .windows(2)
            .map(|w| Segment::line(w[0], w[1]))
            .collect();
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() > 1 && first != last {
                segments.push(Segment::line(last, first));
            }
        }
        Self::new(segments, true)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn start_point(&self) -> Option<PointD> {
        self.segments.first().map(Segment::start)
    }

    pub fn end_point(&self) -> Option<PointD> {
        self.segments.last().map(Segment::end)
    }

    /// Check finiteness, continuity, and closure.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.segments.iter().find(|s| !s.is_finite()) {
            return Err(DrawError::geometry(format!(
                "segment {bad:?} has a non-finite coordinate"
            )));
        }
        for (i, pair) in self.segments.windows(2).enumerate() {
            let gap = pair[0].end().distance(pair[1].start());
            if gap > CONTINUITY_EPSILON {
                return Err(DrawError::geometry(format!(
                    "segment {} does not start where segment {} ends (gap {gap})",
                    i + 1,
                    i
                )));
            }
        }
        if self.closed {
            if let (Some(first), Some(last)) = (self.start_point(), self.end_point()) {
                let gap = last.distance(first);
                if gap > CONTINUITY_EPSILON {
                    return Err(DrawError::geometry(format!(
                        "closed subpath ends {gap} away from its start"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Path
// ============================================================================

/// An ordered set of subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_subpaths(subpaths: Vec<SubPath>) -> Self {
        Self { subpaths }
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(SubPath::is_empty)
    }

    /// Add a whole subpath after the existing ones.
    pub fn push_subpath(&mut self, subpath: SubPath) {
        self.subpaths.push(subpath);
    }

    /// Append a segment to the current subpath.
    ///
    /// The segment continues the current subpath when that subpath is open
    /// and ends exactly where the segment starts; otherwise it begins a new
    /// subpath.
    pub fn append_segment(&mut self, segment: Segment) {
        if let Some(current) = self.subpaths.last_mut() {
            if !current.closed && current.end_point() == Some(segment.start()) {
                current.segments.push(segment);
                return;
            }
        }
        self.subpaths.push(SubPath::new(vec![segment], false));
    }

    /// Close the current subpath, adding a straight closing edge when its
    /// end doesn't already coincide with its start.
    pub fn close_subpath(&mut self) {
        let Some(current) = self.subpaths.last_mut() else {
            return;
        };
        if current.closed {
            return;
        }
        if let (Some(first), Some(last)) = (current.start_point(), current.end_point()) {
            if first != last {
                current.segments.push(Segment::line(last, first));
            }
            current.closed = true;
        }
    }

    /// Axis-aligned box around every start, control, and end point.
    ///
    /// This is the control-polygon bound, not the tight curve bound: it is
    /// conservative and only used for early-out clipping. `None` for an
    /// empty path.
    pub fn bounding_box(&self) -> Option<RectD> {
        let mut points = self
            .subpaths
            .iter()
            .flat_map(|s| s.segments.iter())
            .flat_map(|seg| seg.control_points());
        let first = points.next()?;
        let mut rect = RectD::from_point(first);
        for p in points {
            rect.include(p.x, p.y);
        }
        Some(rect)
    }

    /// Validate every subpath.
    pub fn validate(&self) -> Result<()> {
        self.subpaths.iter().try_for_each(SubPath::validate)
    }
}

// ============================================================================
// Tests
// ============================================================================
