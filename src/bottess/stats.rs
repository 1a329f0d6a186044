// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Counters collected while splitting faces

use serde::{Deserialize, Serialize};

use super::split::SplitShape;

/// Per-shape tally of skipped split attempts.
///
/// A face is counted once per attempt, not once per face. When a neighbour is
/// split and the pair is tested again, the same unsplit face is counted again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedCounts {
    pub vertex_face: u64,
    pub line_line: u64,
    pub line_face: u64,
    pub face_face: u64,
}

impl UnsupportedCounts {
    pub fn record(&mut self, shape: SplitShape) {
        match shape {
            SplitShape::VertexFace => self.vertex_face += 1,
            SplitShape::LineLine => self.line_line += 1,
            SplitShape::LineFace => self.line_face += 1,
            SplitShape::FaceFace => self.face_face += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.vertex_face + self.line_line + self.line_face + self.face_face
    }
}

/// Split statistics for one evaluation, or summed over many
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    /// Face pairs handed to the intersection test
    pub pair_tests: u64,
    /// Pairs that crossed along a segment of non-zero length
    pub intersecting: u64,
    /// Pairs found lying in one plane and overlapping
    pub coplanar: u64,
    /// Faces replaced by two children
    pub faces_split: u64,
    pub unsupported: UnsupportedCounts,
}

impl SplitStats {
    pub fn merge(&mut self, other: &SplitStats) {
        self.pair_tests += other.pair_tests;
        self.intersecting += other.intersecting;
        self.coplanar += other.coplanar;
        self.faces_split += other.faces_split;
        self.unsupported.vertex_face += other.unsupported.vertex_face;
        self.unsupported.line_line += other.unsupported.line_line;
        self.unsupported.line_face += other.unsupported.line_face;
        self.unsupported.face_face += other.unsupported.face_face;
    }

    pub fn merged(mut self, other: &SplitStats) -> Self {
        self.merge(other);
        self
    }
}
