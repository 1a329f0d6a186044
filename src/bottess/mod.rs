// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle-soup CSG evaluation
//!
//! Each leaf of a boolean tree is tessellated into a soup of independent
//! triangles. For every operator the two operand soups are split against
//! each other along their intersection lines, each face is classified as
//! inside, outside or on the other operand's surface, and the faces the
//! operator keeps are merged into the parent soup.

mod classify;
mod compose;
mod intersect;
mod region;
mod soup;
mod split;
mod stats;
mod tree;

pub use classify::{classify_point, classify_soup};
pub use compose::{compose, BoolOp};
pub use intersect::{coplanar_tri_tri, tri_tri_intersect_with_isectline, TriTriHit};
pub use region::{
    region_end, Bottess, CollectingWriter, Region, RegionReport, RegionStatus, RegionWriter,
    TextFacetWriter, WalkSummary,
};
pub use soup::{Face, FaceTag, Soup, DEFAULT_BBOX_FLUFF, FACES_PER_PAGE};
pub use split::{
    classify_endpoint, split_face, split_face_single, EndpointKind, SplitOutcome, SplitShape,
    SplitSides,
};
pub use stats::{SplitStats, UnsupportedCounts};
pub use tree::{
    split_faces, CsgTree, Evaluation, Evaluator, Leaf, LeafTessellator, PairBudget,
    PrimitiveTessellator,
};
