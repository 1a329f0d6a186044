// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Itemized defect lists returned by the solidity check

use serde::{Deserialize, Serialize};

use super::HalfEdge;

/// Indices of defective faces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceErrors {
    pub faces: Vec<usize>,
}

impl FaceErrors {
    pub fn count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Release the list
    pub fn clear(&mut self) {
        self.faces = Vec::new();
    }

    /// Record a face; always asks the scan to continue
    pub fn gather(&mut self, face: usize) -> bool {
        self.faces.push(face);
        true
    }
}

/// Defective half-edges as `(va, vb)` pairs, one entry per half-edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeErrors {
    pub edges: Vec<(usize, usize)>,
}

impl EdgeErrors {
    pub fn count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Release the list
    pub fn clear(&mut self) {
        self.edges = Vec::new();
    }

    /// Record a half-edge; always asks the scan to continue
    pub fn gather(&mut self, edge: &HalfEdge) -> bool {
        self.edges.push(edge.key());
        true
    }
}

/// Everything wrong with a mesh that should be solid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidErrors {
    pub degenerate: FaceErrors,
    pub unmatched: EdgeErrors,
    pub misoriented: EdgeErrors,
    pub excess: EdgeErrors,
}

impl SolidErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.degenerate.is_empty()
            && self.unmatched.is_empty()
            && self.misoriented.is_empty()
            && self.excess.is_empty()
    }

    /// Release all four lists
    pub fn clear(&mut self) {
        self.degenerate.clear();
        self.unmatched.clear();
        self.misoriented.clear();
        self.excess.clear();
    }

    /// All bad edges in one list: unmatched, then misoriented, then excess
    pub fn bad_edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(
            self.unmatched.count() + self.misoriented.count() + self.excess.count(),
        );
        edges.extend_from_slice(&self.unmatched.edges);
        edges.extend_from_slice(&self.misoriented.edges);
        edges.extend_from_slice(&self.excess.edges);
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_edges_order() {
        let mut errors = SolidErrors::new();
        errors.excess.gather(&HalfEdge::new(5, 6));
        errors.unmatched.gather(&HalfEdge::new(2, 1));
        errors.misoriented.gather(&HalfEdge::new(3, 4));

        assert_eq!(errors.bad_edges(), vec![(1, 2), (3, 4), (5, 6)]);

        errors.clear();
        assert!(errors.is_empty());
    }
}
