// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh validation and boolean evaluation.
//!
//! Topology defects found by the validator are *data*, reported through
//! [`crate::trimesh::SolidErrors`]. The enums here cover malformed input and
//! failures of the evaluator itself.

use thiserror::Error;

use crate::bottess::SplitShape;

/// Result type for mesh-level operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;

/// Result type for boolean evaluation.
pub type Result<T> = std::result::Result<T, BottessError>;

/// Errors raised when a triangle mesh is structurally unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// The mesh has no vertices.
    #[error("mesh has no vertices")]
    NoVertices,

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {vertex}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        /// The offending face.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

/// Errors raised by the triangle-soup boolean evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BottessError {
    /// The leaf mesh is malformed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A leaf tessellated to nothing.
    #[error("leaf '{0}' produced no faces")]
    EmptyLeaf(String),

    /// Leaf meshes must be wound counter-clockwise (outward normals).
    #[error("leaf '{0}' is not counter-clockwise oriented")]
    BadOrientation(String),

    /// A face index past the end of a soup.
    #[error("face {index} does not exist (soup has {len} faces)")]
    FaceIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current face count.
        len: usize,
    },

    /// The splitter met an intersection shape it does not implement.
    #[error("unsupported split configuration: {0}")]
    UnsupportedSplit(SplitShape),

    /// Too many triangle pairs were tested.
    #[error("pairwise intersection budget of {0} tests exhausted")]
    BudgetExceeded(u64),

    /// Growing a face array failed.
    #[error("out of memory growing soup to {0} faces")]
    OutOfMemory(usize),

    /// A primitive could not be tessellated.
    #[error("cannot tessellate leaf '{name}': {reason}")]
    Tessellation {
        /// Leaf name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Writing a region's output failed.
    #[error("failed to write region '{path}': {message}")]
    Output {
        /// Region path.
        path: String,
        /// Underlying I/O message.
        message: String,
    },
}
