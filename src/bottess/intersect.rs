// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle/triangle intersection with the intersection segment
//!
//! Tomas Möller, "A Fast Triangle-Triangle Intersection Test", JGT 1997.
//! Each triangle is cut by the other's plane; the two cuts are intervals on
//! the line where the planes meet, and their overlap is the segment.

use nalgebra::{Point3, Vector3};

use super::soup::Face;
use crate::geometry::predicates::largest_axis;
use crate::geometry::Tolerance;

/// Result of intersecting two faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriTriHit {
    Disjoint,
    /// Both faces lie in one plane
    Coplanar { overlap: bool },
    /// The faces cross along this segment
    Segment([Point3<f64>; 2]),
}

impl TriTriHit {
    pub fn intersects(&self) -> bool {
        match self {
            Self::Disjoint => false,
            Self::Coplanar { overlap } => *overlap,
            Self::Segment(_) => true,
        }
    }
}

/// Where one triangle crosses the shared line, as line parameters and points
#[derive(Debug, Clone, Copy)]
struct Interval {
    t: [f64; 2],
    p: [Point3<f64>; 2],
}

impl Interval {
    fn sorted(mut self) -> Self {
        if self.t[0] > self.t[1] {
            self.t.swap(0, 1);
            self.p.swap(0, 1);
        }
        self
    }
}

/// Cut the triangle's two edges leaving `apex`, which is alone on its side
fn fisect2(vert: &[Point3<f64>; 3], vv: [f64; 3], d: [f64; 3], apex: usize) -> Interval {
    let (b, c) = match apex {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };
    let a = apex;

    let s = d[a] / (d[a] - d[b]);
    let t0 = vv[a] + (vv[b] - vv[a]) * s;
    let p0 = vert[a] + (vert[b] - vert[a]) * s;

    let s = d[a] / (d[a] - d[c]);
    let t1 = vv[a] + (vv[c] - vv[a]) * s;
    let p1 = vert[a] + (vert[c] - vert[a]) * s;

    Interval {
        t: [t0, t1],
        p: [p0, p1],
    }
}

/// `None` means every corner is on the other plane
fn compute_intervals(
    vert: &[Point3<f64>; 3],
    vv: [f64; 3],
    d: [f64; 3],
    tol: &Tolerance,
) -> Option<Interval> {
    let apex = if d[0] * d[1] > 0.0 {
        2
    } else if d[0] * d[2] > 0.0 {
        1
    } else if d[1] * d[2] > 0.0 || !tol.near_zero(d[0]) {
        0
    } else if !tol.near_zero(d[1]) {
        1
    } else if !tol.near_zero(d[2]) {
        2
    } else {
        return None;
    };
    Some(fisect2(vert, vv, d, apex))
}

fn edge_edge_test(
    v0: &Point3<f64>,
    u0: &Point3<f64>,
    u1: &Point3<f64>,
    ax: f64,
    ay: f64,
    i0: usize,
    i1: usize,
) -> bool {
    let bx = u0[i0] - u1[i0];
    let by = u0[i1] - u1[i1];
    let cx = v0[i0] - u0[i0];
    let cy = v0[i1] - u0[i1];
    let f = ay * bx - ax * by;
    let d = by * cx - bx * cy;

    if (f > 0.0 && d >= 0.0 && d <= f) || (f < 0.0 && d <= 0.0 && d >= f) {
        let e = ax * cy - ay * cx;
        if f > 0.0 {
            return e >= 0.0 && e <= f;
        }
        return e <= 0.0 && e >= f;
    }
    false
}

fn edge_against_tri_edges(
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    u: &[Point3<f64>; 3],
    i0: usize,
    i1: usize,
) -> bool {
    let ax = v1[i0] - v0[i0];
    let ay = v1[i1] - v0[i1];
    edge_edge_test(v0, &u[0], &u[1], ax, ay, i0, i1)
        || edge_edge_test(v0, &u[1], &u[2], ax, ay, i0, i1)
        || edge_edge_test(v0, &u[2], &u[0], ax, ay, i0, i1)
}

fn point_in_tri(p: &Point3<f64>, u: &[Point3<f64>; 3], i0: usize, i1: usize) -> bool {
    let side = |from: &Point3<f64>, to: &Point3<f64>| {
        let a = to[i1] - from[i1];
        let b = -(to[i0] - from[i0]);
        let c = -a * from[i0] - b * from[i1];
        a * p[i0] + b * p[i1] + c
    };
    let d0 = side(&u[0], &u[1]);
    let d1 = side(&u[1], &u[2]);
    let d2 = side(&u[2], &u[0]);
    d0 * d1 > 0.0 && d0 * d2 > 0.0
}

/// Overlap test for two triangles known to share a plane with normal `n`.
///
/// Projects onto the axis-aligned plane where the triangles have the largest
/// area, then checks edge crossings and containment both ways.
pub fn coplanar_tri_tri(n: &Vector3<f64>, v: &[Point3<f64>; 3], u: &[Point3<f64>; 3]) -> bool {
    let a = n.abs();
    let (i0, i1) = if a.x > a.y {
        if a.x > a.z {
            (1, 2)
        } else {
            (0, 1)
        }
    } else if a.z > a.y {
        (0, 1)
    } else {
        (0, 2)
    };

    edge_against_tri_edges(&v[0], &v[1], u, i0, i1)
        || edge_against_tri_edges(&v[1], &v[2], u, i0, i1)
        || edge_against_tri_edges(&v[2], &v[0], u, i0, i1)
        || point_in_tri(&v[0], u, i0, i1)
        || point_in_tri(&u[0], v, i0, i1)
}

/// Intersect two faces using their cached planes.
pub fn tri_tri_intersect_with_isectline(a: &Face, b: &Face, tol: &Tolerance) -> TriTriHit {
    // corners of b against the plane of a
    let du = b.vert.map(|p| a.plane.distance(&p));
    if du[0] * du[1] > 0.0 && du[0] * du[2] > 0.0 {
        return TriTriHit::Disjoint;
    }

    let dv = a.vert.map(|p| b.plane.distance(&p));
    if dv[0] * dv[1] > 0.0 && dv[0] * dv[2] > 0.0 {
        return TriTriHit::Disjoint;
    }

    let direction = a.plane.normal.cross(&b.plane.normal);
    let axis = largest_axis(&direction);
    let vp = a.vert.map(|p| p[axis]);
    let up = b.vert.map(|p| p[axis]);

    let coplanar = || TriTriHit::Coplanar {
        overlap: coplanar_tri_tri(&a.plane.normal, &a.vert, &b.vert),
    };
    let Some(first) = compute_intervals(&a.vert, vp, dv, tol) else {
        return coplanar();
    };
    let Some(second) = compute_intervals(&b.vert, up, du, tol) else {
        return coplanar();
    };

    let first = first.sorted();
    let second = second.sorted();
    if first.t[1] < second.t[0] || second.t[1] < first.t[0] {
        return TriTriHit::Disjoint;
    }

    // inner endpoints of the two intervals
    let start = if second.t[0] < first.t[0] {
        first.p[0]
    } else {
        second.p[0]
    };
    let end = if second.t[1] < first.t[1] {
        second.p[1]
    } else {
        first.p[1]
    };
    TriTriHit::Segment([start, end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bottess::soup::{FaceTag, DEFAULT_BBOX_FLUFF};
    use approx::assert_relative_eq;

    fn face(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Face {
        Face::from_points(
            [Point3::from(a), Point3::from(b), Point3::from(c)],
            FaceTag::OUTSIDE,
            &Tolerance::default(),
            DEFAULT_BBOX_FLUFF,
        )
        .unwrap()
    }

    #[test]
    fn test_crossing_triangles_give_segment() {
        let a = face([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let b = face([1.0, 1.0, -1.0], [3.0, 1.0, -1.0], [1.0, 1.0, 1.0]);

        let hit = tri_tri_intersect_with_isectline(&a, &b, &Tolerance::default());
        let TriTriHit::Segment([p, q]) = hit else {
            panic!("expected a segment, got {:?}", hit);
        };
        assert_relative_eq!(p, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(q, Point3::new(2.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_separated_planes_are_disjoint() {
        let a = face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = face([0.0, 0.0, 1.0], [1.0, 0.0, 2.0], [0.0, 1.0, 3.0]);
        let hit = tri_tri_intersect_with_isectline(&a, &b, &Tolerance::default());
        assert_eq!(hit, TriTriHit::Disjoint);
        assert!(!hit.intersects());
    }

    #[test]
    fn test_line_crosses_but_intervals_miss() {
        // b pierces a's plane far from a
        let a = face([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let b = face([5.0, 0.5, -1.0], [6.0, 0.5, -1.0], [5.0, 0.5, 1.0]);
        assert_eq!(
            tri_tri_intersect_with_isectline(&a, &b, &Tolerance::default()),
            TriTriHit::Disjoint
        );
    }

    #[test]
    fn test_shared_cube_face_is_coplanar_overlap() {
        // the two triangles of an x = 1 face, split along opposite diagonals
        let a = face([1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]);
        let b = face([1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]);

        let hit = tri_tri_intersect_with_isectline(&a, &b, &Tolerance::default());
        assert_eq!(hit, TriTriHit::Coplanar { overlap: true });
    }

    #[test]
    fn test_coplanar_apart() {
        let n = Vector3::z();
        let v = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let far = v.map(|p| p + Vector3::new(5.0, 5.0, 0.0));
        let inner = [
            Point3::new(0.1, 0.1, 0.0),
            Point3::new(0.3, 0.1, 0.0),
            Point3::new(0.1, 0.3, 0.0),
        ];

        assert!(!coplanar_tri_tri(&n, &v, &far));
        // containment without any edge crossing
        assert!(coplanar_tri_tri(&n, &v, &inner));
        assert!(coplanar_tri_tri(&n, &inner, &v));
    }
}
