// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh defect classifiers
//!
//! Each classifier walks its input and hands every defect to a callback that
//! returns `true` to keep scanning or `false` to stop. The return value is the
//! number of defects seen, including the one that stopped the scan.

use serde::{Deserialize, Serialize};

use super::halfedge::{edge_runs, HalfEdge};

/// Keep scanning after every defective face
pub fn face_continue(_face: usize) -> bool {
    true
}

/// Stop at the first defective face
pub fn face_exit(_face: usize) -> bool {
    false
}

/// Keep scanning after every defective half-edge
pub fn edge_continue(_edge: &HalfEdge) -> bool {
    true
}

/// Stop at the first defective half-edge
pub fn edge_exit(_edge: &HalfEdge) -> bool {
    false
}

/// How far a scan goes once it finds something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanPolicy {
    /// Enumerate every defect
    ContinueAlways,
    /// Answer "is there any defect" as cheaply as possible
    ExitOnFirst,
}

impl ScanPolicy {
    pub fn face_callback(self) -> fn(usize) -> bool {
        match self {
            Self::ContinueAlways => face_continue,
            Self::ExitOnFirst => face_exit,
        }
    }

    pub fn edge_callback(self) -> fn(&HalfEdge) -> bool {
        match self {
            Self::ContinueAlways => edge_continue,
            Self::ExitOnFirst => edge_exit,
        }
    }
}

/// Two or more corners share a vertex index
pub fn is_degenerate(face: &[usize; 3]) -> bool {
    face[0] == face[1] || face[1] == face[2] || face[2] == face[0]
}

/// Count degenerate faces, passing each face index to `on_face`
pub fn degenerate_faces<F>(faces: &[[usize; 3]], mut on_face: F) -> usize
where
    F: FnMut(usize) -> bool,
{
    let mut count = 0;
    for (index, face) in faces.iter().enumerate() {
        if is_degenerate(face) {
            count += 1;
            if !on_face(index) {
                return count;
            }
        }
    }
    count
}

/// Kinds of edge-level topology defects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDefect {
    /// A half-edge with no partner: open boundary
    Unmatched,
    /// A matched pair walked the same way by both faces
    Misoriented,
    /// Three or more half-edges on one edge: non-manifold junction
    Excess,
}

impl EdgeDefect {
    /// Does the run of same-edge half-edges exhibit this defect?
    pub fn matches(self, run: &[HalfEdge]) -> bool {
        match self {
            Self::Unmatched => run.len() == 1,
            Self::Misoriented => run.len() == 2 && run[0].flipped == run[1].flipped,
            Self::Excess => run.len() > 2,
        }
    }
}

/// Count runs in the sorted table showing `defect`.
///
/// Every half-edge of a defective run goes to `on_edge`: one for an unmatched
/// edge, two for a misoriented pair, all of them for an excess edge.
pub fn count_error_edges<F>(edges: &[HalfEdge], defect: EdgeDefect, mut on_edge: F) -> usize
where
    F: FnMut(&HalfEdge) -> bool,
{
    let mut matching = 0;
    for run in edge_runs(edges) {
        if !defect.matches(run) {
            continue;
        }
        matching += 1;
        if !run.iter().all(|edge| on_edge(edge)) {
            return matching;
        }
    }
    matching
}

pub fn unmatched_edges<F>(edges: &[HalfEdge], on_edge: F) -> usize
where
    F: FnMut(&HalfEdge) -> bool,
{
    count_error_edges(edges, EdgeDefect::Unmatched, on_edge)
}

pub fn misoriented_edges<F>(edges: &[HalfEdge], on_edge: F) -> usize
where
    F: FnMut(&HalfEdge) -> bool,
{
    count_error_edges(edges, EdgeDefect::Misoriented, on_edge)
}

pub fn excess_edges<F>(edges: &[HalfEdge], on_edge: F) -> usize
where
    F: FnMut(&HalfEdge) -> bool,
{
    count_error_edges(edges, EdgeDefect::Excess, on_edge)
}
