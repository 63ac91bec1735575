//! Geometric math utilities.
//!
//! Cross products, distances, line intersection and polygon area used by
//! the flattener and the stroker.

use crate::basics::PointD;

// ============================================================================
// Constants
// ============================================================================

/// Coinciding points maximal distance (epsilon).
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

/// Epsilon for intersection calculations.
pub const INTERSECTION_EPSILON: f64 = 1.0e-30;

// ============================================================================
// Cross product and distances
// ============================================================================

/// Cross product of vectors (p1→p2) and (p2→p).
/// The sign indicates which side of the line p1→p2 the point p is on.
#[inline]
pub fn cross_product(p1: PointD, p2: PointD, p: PointD) -> f64 {
    (p.x - p2.x) * (p2.y - p1.y) - (p.y - p2.y) * (p2.x - p1.x)
}

/// Euclidean distance between two points.
#[inline]
pub fn calc_distance(a: PointD, b: PointD) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn calc_sq_distance(a: PointD, b: PointD) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Squared distance from `p` to the closest point on segment a→b.
pub fn calc_segment_point_sq_distance(a: PointD, b: PointD, p: PointD) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx == 0.0 && dy == 0.0 {
        return calc_sq_distance(p, a);
    }
    let u = ((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy);
    if u <= 0.0 {
        calc_sq_distance(p, a)
    } else if u >= 1.0 {
        calc_sq_distance(p, b)
    } else {
        calc_sq_distance(p, a.lerp(b, u))
    }
}

// ============================================================================
// Intersection
// ============================================================================

/// Intersection point of the infinite lines a→b and c→d.
/// Returns `None` if they are parallel.
#[inline]
pub fn calc_intersection(a: PointD, b: PointD, c: PointD, d: PointD) -> Option<PointD> {
    let num = (a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y);
    let den = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if den.abs() < INTERSECTION_EPSILON {
        return None;
    }
    let r = num / den;
    Some(PointD::new(a.x + r * (b.x - a.x), a.y + r * (b.y - a.y)))
}

// ============================================================================
// Area
// ============================================================================

/// Signed area of a closed polygon (shoelace formula).
///
/// Positive for contours wound clockwise in y-down device space.
pub fn calc_polygon_area(vertices: &[PointD]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut prev = vertices[vertices.len() - 1];
    for &v in vertices {
        sum += prev.x * v.y - v.x * prev.y;
        prev = v;
    }
    sum * 0.5
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> PointD {
        PointD::new(x, y)
    }

    #[test]
    fn test_cross_product_sides() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        assert!(cross_product(a, b, p(5.0, 5.0)) < 0.0);
        assert!(cross_product(a, b, p(5.0, -5.0)) > 0.0);
        assert_eq!(cross_product(a, b, p(20.0, 0.0)), 0.0);
    }

    #[test]
    fn test_distances() {
        assert!((calc_distance(p(0.0, 0.0), p(3.0, 4.0)) - 5.0).abs() < 1e-12);
        assert_eq!(calc_sq_distance(p(0.0, 0.0), p(3.0, 4.0)), 25.0);
    }

    #[test]
    fn test_segment_point_distance() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        assert_eq!(calc_segment_point_sq_distance(a, b, p(5.0, 3.0)), 9.0);
        assert_eq!(calc_segment_point_sq_distance(a, b, p(-3.0, 4.0)), 25.0);
        assert_eq!(calc_segment_point_sq_distance(a, a, p(3.0, 4.0)), 25.0);
    }

    #[test]
    fn test_intersection() {
        let i = calc_intersection(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0));
        let i = i.unwrap();
        assert!((i.x - 5.0).abs() < 1e-12);
        assert!((i.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_intersection_parallel() {
        assert!(calc_intersection(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 1.0), p(10.0, 1.0)).is_none());
    }

    #[test]
    fn test_polygon_area() {
        let square = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        assert!((calc_polygon_area(&square) - 100.0).abs() < 1e-12);
        let reversed: Vec<_> = square.iter().rev().copied().collect();
        assert!((calc_polygon_area(&reversed) + 100.0).abs() < 1e-12);
        assert_eq!(calc_polygon_area(&square[..2]), 0.0);
    }
}
