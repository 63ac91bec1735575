//! Polylines annotated with per-vertex segment lengths.
//!
//! The stroker walks a contour with prev/curr/next access and needs the
//! length of each edge to normalise offsets; [`VertexSequence`] stores both
//! and drops coincident vertices so no edge has zero length.

use crate::basics::PointD;
use crate::math::{calc_distance, VERTEX_DIST_EPSILON};

// ============================================================================
// VertexDist
// ============================================================================

/// A vertex plus the distance to the following vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexDist {
    pub x: f64,
    pub y: f64,
    pub dist: f64,
}

impl VertexDist {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, dist: 0.0 }
    }

    pub fn point(&self) -> PointD {
        PointD::new(self.x, self.y)
    }
}

impl From<PointD> for VertexDist {
    fn from(p: PointD) -> Self {
        Self::new(p.x, p.y)
    }
}

// ============================================================================
// VertexSequence
// ============================================================================

/// A deduplicated polyline with cyclic neighbour access.
#[derive(Debug, Clone, Default)]
pub struct VertexSequence {
    vertices: Vec<VertexDist>,
}

impl VertexSequence {
    /// Build from raw points. Consecutive coincident points collapse into
    /// one; for closed input, trailing points that coincide with the first
    /// are dropped as well.
    pub fn new(points: &[PointD], closed: bool) -> Self {
        let mut vertices: Vec<VertexDist> = Vec::with_capacity(points.len());
        for &p in points {
            match vertices.last() {
                Some(last) if calc_distance(last.point(), p) <= VERTEX_DIST_EPSILON => {}
                _ => vertices.push(p.into()),
            }
        }
        if closed {
            while vertices.len() > 1 {
                let first = vertices[0].point();
                let last = vertices[vertices.len() - 1].point();
                if calc_distance(last, first) > VERTEX_DIST_EPSILON {
                    break;
                }
                vertices.pop();
            }
        }

        let n = vertices.len();
        for i in 0..n {
            let next = if i + 1 < n {
                Some(vertices[i + 1].point())
            } else if closed && n > 1 {
                Some(vertices[0].point())
            } else {
                None
            };
            vertices[i].dist = next.map_or(0.0, |q| calc_distance(vertices[i].point(), q));
        }

        Self { vertices }
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex before `idx`, wrapping around.
    pub fn prev(&self, idx: usize) -> &VertexDist {
        let n = self.vertices.len();
        &self.vertices[(idx + n - 1) % n]
    }

    pub fn curr(&self, idx: usize) -> &VertexDist {
        &self.vertices[idx]
    }

    /// Vertex after `idx`, wrapping around.
    pub fn next(&self, idx: usize) -> &VertexDist {
        &self.vertices[(idx + 1) % self.vertices.len()]
    }
}

impl core::ops::Index<usize> for VertexSequence {
    type Output = VertexDist;

    fn index(&self, i: usize) -> &VertexDist {
        &self.vertices[i]
    }
}

// ============================================================================
// Tests
// ============================================================================
