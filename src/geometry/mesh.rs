// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed triangle mesh (BoT) representation and utilities

use ahash::AHashMap;
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

use super::BoundingBox;
use crate::error::{MeshError, MeshResult};

/// Declared winding of a BoT's faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// No winding convention
    Unoriented,
    /// Counter-clockwise seen from outside (outward normals)
    #[default]
    Ccw,
    /// Clockwise seen from outside
    Cw,
}

/// Bag of triangles: shared vertices plus faces indexing into them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotMesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<[usize; 3]>,
    #[serde(default)]
    pub orientation: Orientation,
}

impl BotMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            orientation: Orientation::Ccw,
        }
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            orientation: Orientation::Ccw,
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    /// Add a face
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of face `index`
    pub fn triangle(&self, index: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[index];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Check that the mesh has geometry and every face index is in range
    pub fn validate_indices(&self) -> MeshResult<()> {
        if self.vertices.is_empty() {
            return Err(MeshError::NoVertices);
        }
        if self.faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        validate_indices(self.vertices.len(), &self.faces)
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Transform all vertices by a matrix
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point(vertex);
        }
    }

    /// Reverse the winding of every face
    pub fn flip(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
        self.orientation = match self.orientation {
            Orientation::Ccw => Orientation::Cw,
            Orientation::Cw => Orientation::Ccw,
            Orientation::Unoriented => Orientation::Unoriented,
        };
    }

    /// Weld vertices that are within `epsilon` of each other.
    ///
    /// Points are bucketed on an `epsilon` grid and compared against the
    /// neighbouring cells, so welding is linear in the vertex count.
    /// Returns the number of vertices removed.
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        if self.vertices.is_empty() || epsilon <= 0.0 {
            return 0;
        }

        let original_count = self.vertices.len();
        let mut grid: AHashMap<(i64, i64, i64), Vec<usize>> = AHashMap::new();
        let mut new_vertices: Vec<Point3<f64>> = Vec::with_capacity(original_count);
        let mut remap = vec![0usize; original_count];

        let cell = |p: &Point3<f64>| {
            (
                (p.x / epsilon).floor() as i64,
                (p.y / epsilon).floor() as i64,
                (p.z / epsilon).floor() as i64,
            )
        };

        for (i, position) in self.vertices.iter().enumerate() {
            let (cx, cy, cz) = cell(position);
            let mut found = None;

            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        if let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) {
                            if let Some(&j) = bucket
                                .iter()
                                .find(|&&j| (new_vertices[j] - position).norm() < epsilon)
                            {
                                found = Some(j);
                                break 'search;
                            }
                        }
                    }
                }
            }

            remap[i] = match found {
                Some(j) => j,
                None => {
                    let j = new_vertices.len();
                    new_vertices.push(*position);
                    grid.entry((cx, cy, cz)).or_default().push(j);
                    j
                }
            };
        }

        for face in &mut self.faces {
            for index in face.iter_mut() {
                *index = remap[*index];
            }
        }
        self.vertices = new_vertices;

        original_count - self.vertices.len()
    }
}

/// Check that every face index is below `vertex_count`
pub fn validate_indices(vertex_count: usize, faces: &[[usize; 3]]) -> MeshResult<()> {
    for (face, indices) in faces.iter().enumerate() {
        if let Some(&vertex) = indices.iter().find(|&&v| v >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                face,
                vertex,
                vertex_count,
            });
        }
    }
    Ok(())
}
