// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge topology validation for triangle meshes
//!
//! Builds a sorted half-edge table from a face index array and classifies
//! degenerate faces, boundary edges, inconsistently wound edges and
//! non-manifold edges.

mod defects;
mod halfedge;
mod report;
mod solid;

pub use defects::{
    count_error_edges, degenerate_faces, edge_continue, edge_exit, excess_edges, face_continue,
    face_exit, is_degenerate, misoriented_edges, unmatched_edges, EdgeDefect, ScanPolicy,
};
pub use halfedge::{edge_runs, generate_edge_list, HalfEdge};
pub use report::{EdgeErrors, FaceErrors, SolidErrors};
pub use solid::{
    closed_fan, orientable, solid, solid_report, DefectFlags, SolidVerdict, MIN_SOLID_FACES,
    MIN_SOLID_VERTICES,
};

pub use crate::geometry::validate_indices;
