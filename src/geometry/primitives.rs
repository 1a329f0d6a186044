// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives tessellated into closed, outward-wound BoTs

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::BotMesh;

/// Smallest segment count that still encloses volume
const MIN_SEGMENTS: u32 = 3;

/// Leaf shapes the built-in tessellator understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Axis-aligned box between two corners
    Cuboid { min: Point3<f64>, max: Point3<f64> },
    /// Four arbitrary, non-coplanar points
    Tetrahedron { points: [Point3<f64>; 4] },
    /// UV sphere; `segments` slices around, half as many stacks
    Sphere {
        center: Point3<f64>,
        radius: f64,
        #[serde(default)]
        segments: u32,
    },
    /// Right circular cylinder along +Z from `base`
    Cylinder {
        base: Point3<f64>,
        height: f64,
        radius: f64,
        #[serde(default)]
        segments: u32,
    },
    /// Truncated cone along +Z; `top_radius` may be zero
    Cone {
        base: Point3<f64>,
        height: f64,
        radius: f64,
        top_radius: f64,
        #[serde(default)]
        segments: u32,
    },
    /// Literal BoT, passed through unchanged
    Mesh(BotMesh),
}

impl Primitive {
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self::Cuboid { min, max }
    }

    /// Unit cube with its minimum corner at `origin`
    pub fn unit_cube(origin: Point3<f64>) -> Self {
        Self::Cuboid {
            min: origin,
            max: Point3::new(origin.x + 1.0, origin.y + 1.0, origin.z + 1.0),
        }
    }

    pub fn tetrahedron(points: [Point3<f64>; 4]) -> Self {
        Self::Tetrahedron { points }
    }

    pub fn sphere(center: Point3<f64>, radius: f64, segments: u32) -> Self {
        Self::Sphere {
            center,
            radius,
            segments,
        }
    }

    pub fn cylinder(base: Point3<f64>, height: f64, radius: f64, segments: u32) -> Self {
        Self::Cylinder {
            base,
            height,
            radius,
            segments,
        }
    }

    pub fn cone(base: Point3<f64>, height: f64, radius: f64, top_radius: f64, segments: u32) -> Self {
        Self::Cone {
            base,
            height,
            radius,
            top_radius,
            segments,
        }
    }

    /// Why this primitive cannot enclose volume, if it cannot
    pub fn invalid_reason(&self) -> Option<&'static str> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match self {
            Self::Cuboid { min, max } => {
                let size = max - min;
                (!size.iter().all(|d| positive(d.abs()))).then_some("box has zero extent")
            }
            Self::Tetrahedron { points } => {
                let volume = (points[1] - points[0])
                    .cross(&(points[2] - points[0]))
                    .dot(&(points[3] - points[0]));
                (!positive(volume.abs())).then_some("tetrahedron points are coplanar")
            }
            Self::Sphere { radius, .. } => (!positive(*radius)).then_some("radius must be positive"),
            Self::Cylinder { height, radius, .. } => {
                (!positive(*height) || !positive(*radius))
                    .then_some("height and radius must be positive")
            }
            Self::Cone {
                height,
                radius,
                top_radius,
                ..
            } => {
                let top_ok = top_radius.is_finite() && *top_radius >= 0.0;
                (!positive(*height) || !positive(*radius) || !top_ok)
                    .then_some("height and radius must be positive, top radius non-negative")
            }
            Self::Mesh(_) => None,
        }
    }

    /// Tessellate; a `segments` of zero falls back to `default_segments`
    pub fn to_mesh(&self, default_segments: u32) -> BotMesh {
        let pick = |n: u32| (if n > 0 { n } else { default_segments }).max(MIN_SEGMENTS);
        match self {
            Self::Cuboid { min, max } => generate_cuboid_mesh(min, max),
            Self::Tetrahedron { points } => generate_tetrahedron_mesh(points),
            Self::Sphere {
                center,
                radius,
                segments,
            } => generate_sphere_mesh(center, *radius, pick(*segments)),
            Self::Cylinder {
                base,
                height,
                radius,
                segments,
            } => generate_cone_mesh(base, *height, *radius, *radius, pick(*segments)),
            Self::Cone {
                base,
                height,
                radius,
                top_radius,
                segments,
            } => generate_cone_mesh(base, *height, *radius, *top_radius, pick(*segments)),
            Self::Mesh(mesh) => mesh.clone(),
        }
    }
}

fn generate_cuboid_mesh(min: &Point3<f64>, max: &Point3<f64>) -> BotMesh {
    let (min_x, max_x) = (min.x.min(max.x), min.x.max(max.x));
    let (min_y, max_y) = (min.y.min(max.y), min.y.max(max.y));
    let (min_z, max_z) = (min.z.min(max.z), min.z.max(max.z));

    let vertices = vec![
        Point3::new(min_x, min_y, min_z),
        Point3::new(max_x, min_y, min_z),
        Point3::new(max_x, max_y, min_z),
        Point3::new(min_x, max_y, min_z),
        Point3::new(min_x, min_y, max_z),
        Point3::new(max_x, min_y, max_z),
        Point3::new(max_x, max_y, max_z),
        Point3::new(min_x, max_y, max_z),
    ];

    let faces = vec![
        // Front (z+)
        [4, 5, 6],
        [4, 6, 7],
        // Back (z-)
        [1, 0, 3],
        [1, 3, 2],
        // Right (x+)
        [5, 1, 2],
        [5, 2, 6],
        // Left (x-)
        [0, 4, 7],
        [0, 7, 3],
        // Top (y+)
        [7, 6, 2],
        [7, 2, 3],
        // Bottom (y-)
        [0, 1, 5],
        [0, 5, 4],
    ];

    BotMesh::from_parts(vertices, faces)
}

fn generate_tetrahedron_mesh(points: &[Point3<f64>; 4]) -> BotMesh {
    let volume = (points[1] - points[0])
        .cross(&(points[2] - points[0]))
        .dot(&(points[3] - points[0]));

    let mut faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    if volume < 0.0 {
        // negatively oriented input: reverse every face
        for face in &mut faces {
            face.swap(1, 2);
        }
    }

    BotMesh::from_parts(points.to_vec(), faces)
}

fn generate_sphere_mesh(center: &Point3<f64>, radius: f64, segments: u32) -> BotMesh {
    let slices = segments as usize;
    let stacks = (segments as usize / 2).max(2);
    let mut mesh = BotMesh::with_capacity(slices * (stacks - 1) + 2, 2 * slices * (stacks - 1));

    let north = mesh.add_vertex(Point3::new(center.x, center.y, center.z + radius));
    for i in 1..stacks {
        let phi = PI * i as f64 / stacks as f64;
        let z = radius * phi.cos();
        let r = radius * phi.sin();
        for j in 0..slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            mesh.add_vertex(Point3::new(
                center.x + r * theta.cos(),
                center.y + r * theta.sin(),
                center.z + z,
            ));
        }
    }
    let south = mesh.add_vertex(Point3::new(center.x, center.y, center.z - radius));

    let ring = |i: usize, j: usize| 1 + (i - 1) * slices + (j % slices);

    for j in 0..slices {
        mesh.add_face([north, ring(1, j), ring(1, j + 1)]);
    }
    for i in 1..stacks - 1 {
        for j in 0..slices {
            let a = ring(i, j);
            let b = ring(i, j + 1);
            let c = ring(i + 1, j);
            let d = ring(i + 1, j + 1);
            mesh.add_face([a, c, d]);
            mesh.add_face([a, d, b]);
        }
    }
    for j in 0..slices {
        mesh.add_face([south, ring(stacks - 1, j + 1), ring(stacks - 1, j)]);
    }

    mesh
}

fn generate_cone_mesh(
    base: &Point3<f64>,
    height: f64,
    radius: f64,
    top_radius: f64,
    segments: u32,
) -> BotMesh {
    let n = segments as usize;
    let apex = top_radius <= 0.0;
    let mut mesh = BotMesh::with_capacity(2 * n + 2, 4 * n);

    let circle = |r: f64, z: f64, j: usize| {
        let theta = 2.0 * PI * j as f64 / n as f64;
        Point3::new(base.x + r * theta.cos(), base.y + r * theta.sin(), base.z + z)
    };

    for j in 0..n {
        mesh.add_vertex(circle(radius, 0.0, j));
    }
    let bottom_center = mesh.add_vertex(*base);
    let bottom = |j: usize| j % n;

    if apex {
        let tip = mesh.add_vertex(Point3::new(base.x, base.y, base.z + height));
        for j in 0..n {
            mesh.add_face([tip, bottom(j), bottom(j + 1)]);
            mesh.add_face([bottom_center, bottom(j + 1), bottom(j)]);
        }
        return mesh;
    }

    let top_start = mesh.vertex_count();
    for j in 0..n {
        mesh.add_vertex(circle(top_radius, height, j));
    }
    let top_center = mesh.add_vertex(Point3::new(base.x, base.y, base.z + height));
    let top = |j: usize| top_start + j % n;

    for j in 0..n {
        // side quad
        mesh.add_face([top(j), bottom(j), bottom(j + 1)]);
        mesh.add_face([top(j), bottom(j + 1), top(j + 1)]);
        // caps
        mesh.add_face([top_center, top(j), top(j + 1)]);
        mesh.add_face([bottom_center, bottom(j + 1), bottom(j)]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_shares_corners() {
        let mesh = Primitive::unit_cube(Point3::origin()).to_mesh(16);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = Primitive::sphere(Point3::origin(), 2.0, 8).to_mesh(16);
        // 3 rings of 8 plus two poles
        assert_eq!(mesh.vertex_count(), 26);
        assert_eq!(mesh.face_count(), 48);
    }

    #[test]
    fn test_zero_segments_uses_default() {
        let mesh = Primitive::cylinder(Point3::origin(), 2.0, 1.0, 0).to_mesh(6);
        assert_eq!(mesh.vertex_count(), 14);
        assert_eq!(mesh.face_count(), 24);

        let cone = Primitive::cone(Point3::origin(), 2.0, 1.0, 0.0, 5).to_mesh(6);
        assert_eq!(cone.vertex_count(), 7);
        assert_eq!(cone.face_count(), 10);
    }

    #[test]
    fn test_invalid_reason() {
        assert!(Primitive::unit_cube(Point3::origin()).invalid_reason().is_none());
        assert!(Primitive::sphere(Point3::origin(), 0.0, 8).invalid_reason().is_some());
        assert!(Primitive::cuboid(Point3::origin(), Point3::new(1.0, 0.0, 1.0))
            .invalid_reason()
            .is_some());
        assert!(Primitive::cone(Point3::origin(), 1.0, 1.0, 0.0, 8).invalid_reason().is_none());
    }

    #[test]
    fn test_tetrahedron_is_outward() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let mesh = Primitive::tetrahedron(points).to_mesh(0);
        let centroid = Point3::new(0.25, 0.25, 0.25);

        for i in 0..mesh.face_count() {
            let [a, b, c] = mesh.triangle(i);
            let normal = (b - a).cross(&(c - a));
            assert!(normal.dot(&(a - centroid)) > 0.0, "face {} points inward", i);
        }
    }
}
