// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sorted half-edge table built from a face index array

use serde::{Deserialize, Serialize};

/// One directed face edge, stored in canonical (low, high) vertex order.
///
/// `flipped` records that the face walked the edge from `vb` to `va`. Two
/// half-edges of the same undirected edge belong to consistently wound faces
/// exactly when their `flipped` values differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HalfEdge {
    pub va: usize,
    pub vb: usize,
    pub flipped: bool,
}

impl HalfEdge {
    /// Canonicalize the directed edge `from -> to`
    pub fn new(from: usize, to: usize) -> Self {
        if from < to {
            Self {
                va: from,
                vb: to,
                flipped: false,
            }
        } else {
            Self {
                va: to,
                vb: from,
                flipped: true,
            }
        }
    }

    /// Sort key of the undirected edge
    pub fn key(&self) -> (usize, usize) {
        (self.va, self.vb)
    }

    /// Both half-edges lie on the same undirected edge
    pub fn same_edge(&self, other: &HalfEdge) -> bool {
        self.va == other.va && self.vb == other.vb
    }
}

/// Build the half-edge table for `faces`.
///
/// Face `(a, b, c)` contributes `(a, b)`, `(b, c)` and `(c, a)`. The table is
/// sorted by `(va, vb)` with a stable sort, so half-edges of the same edge keep
/// their face order. Returns `None` when there are no faces; no other checks
/// are made here.
pub fn generate_edge_list(faces: &[[usize; 3]]) -> Option<Vec<HalfEdge>> {
    if faces.is_empty() {
        return None;
    }

    let mut edges = Vec::with_capacity(faces.len() * 3);
    for &[a, b, c] in faces {
        edges.push(HalfEdge::new(a, b));
        edges.push(HalfEdge::new(b, c));
        edges.push(HalfEdge::new(c, a));
    }

    edges.sort_by_key(HalfEdge::key);
    Some(edges)
}

/// Runs of half-edges sharing one undirected edge, in table order
pub fn edge_runs(edges: &[HalfEdge]) -> impl Iterator<Item = &[HalfEdge]> {
    edges.chunk_by(|a, b| a.same_edge(b))
}
