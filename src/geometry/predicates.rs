// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric predicates with explicit tolerances

use nalgebra::{Point3, Vector3};

use super::Tolerance;

/// Where a point lies relative to a line segment `a -> b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentHit {
    /// Farther than `tol.dist` from the supporting line
    OffLine,
    /// On the supporting line, beyond one of the endpoints
    OffSegment,
    /// Coincides with `a`
    AtStart,
    /// Coincides with `b`
    AtEnd,
    /// Strictly between the endpoints; carries the parameter along `a -> b`
    Interior(f64),
}

/// Classify `p` against the segment `a -> b`.
///
/// Endpoint coincidence is tested first, so a point near both a short
/// segment's ends reports `AtStart`.
pub fn isect_pt_lseg(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    tol: &Tolerance,
) -> SegmentHit {
    let a_to_p = p - a;
    let dist_sq_a = a_to_p.norm_squared();
    if dist_sq_a < tol.dist_sq() {
        return SegmentHit::AtStart;
    }
    if (p - b).norm_squared() < tol.dist_sq() {
        return SegmentHit::AtEnd;
    }

    let a_to_b = b - a;
    let len = a_to_b.norm();
    if len < tol.dist {
        // degenerate segment, and p is at neither end
        return SegmentHit::OffLine;
    }

    let along = a_to_p.dot(&a_to_b) / len;
    let off_line_sq = dist_sq_a - along * along;
    if off_line_sq > tol.dist_sq() {
        return SegmentHit::OffLine;
    }

    let t = along / len;
    if !(0.0..=1.0).contains(&t) {
        return SegmentHit::OffSegment;
    }
    SegmentHit::Interior(t)
}

/// Index of the component with the largest magnitude; first one wins ties
pub fn largest_axis(v: &Vector3<f64>) -> usize {
    let mut axis = 0;
    let mut max = v.x.abs();
    if v.y.abs() > max {
        max = v.y.abs();
        axis = 1;
    }
    if v.z.abs() > max {
        axis = 2;
    }
    axis
}

/// Moller-Trumbore ray/triangle test; returns the ray parameter of a forward hit
pub fn ray_triangle(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    tol: &Tolerance,
) -> Option<f64> {
    const EPS: f64 = 1e-12;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < EPS {
        return None; // Ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > tol.dist).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_segment_classification() {
        let tol = Tolerance::default();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);

        assert_eq!(isect_pt_lseg(&a, &a, &b, &tol), SegmentHit::AtStart);
        assert_eq!(isect_pt_lseg(&b, &a, &b, &tol), SegmentHit::AtEnd);
        assert_eq!(
            isect_pt_lseg(&Point3::new(0.5, 0.0, 0.0), &a, &b, &tol),
            SegmentHit::Interior(0.25)
        );
        assert_eq!(
            isect_pt_lseg(&Point3::new(3.0, 0.0, 0.0), &a, &b, &tol),
            SegmentHit::OffSegment
        );
        assert_eq!(
            isect_pt_lseg(&Point3::new(1.0, 0.1, 0.0), &a, &b, &tol),
            SegmentHit::OffLine
        );
    }

    #[test]
    fn test_largest_axis() {
        assert_eq!(largest_axis(&Vector3::new(1.0, -3.0, 2.0)), 1);
        assert_eq!(largest_axis(&Vector3::new(0.0, 0.0, -0.5)), 2);
        assert_eq!(largest_axis(&Vector3::new(0.0, 0.0, 0.0)), 0);
        assert_eq!(largest_axis(&Vector3::new(2.0, 2.0, 2.0)), 0);
    }

    #[test]
    fn test_ray_triangle() {
        let tol = Tolerance::default();
        let v0 = Point3::new(1.0, -1.0, -1.0);
        let v1 = Point3::new(1.0, 1.0, -1.0);
        let v2 = Point3::new(1.0, 0.0, 1.0);
        let origin = Point3::new(0.0, 0.0, 0.0);

        let hit = ray_triangle(&origin, &Vector3::x(), &v0, &v1, &v2, &tol);
        assert!(matches!(hit, Some(t) if (t - 1.0).abs() < 1e-12));
        assert!(ray_triangle(&origin, &-Vector3::x(), &v0, &v1, &v2, &tol).is_none());
    }
}
