// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! bottess
//!
//! Topology validation for triangle meshes (BoTs) and a triangle-soup CSG
//! evaluator. [`trimesh`] answers whether an indexed triangle mesh bounds a
//! closed, consistently oriented solid. [`bottess`] resolves union,
//! intersection and subtraction trees of tessellated primitives into a
//! single soup of triangles.

pub mod bottess;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod trimesh;

pub use bottess::{
    BoolOp, Bottess, CsgTree, Evaluation, Evaluator, Leaf, PrimitiveTessellator, Region, Soup,
    SplitStats, WalkSummary,
};
pub use config::EngineConfig;
pub use error::{BottessError, MeshError, Result};
pub use geometry::{BotMesh, Primitive, Tolerance};
pub use trimesh::{solid, solid_report, SolidErrors, SolidVerdict};

/// Evaluate a single tree with the built-in primitive tessellator
pub fn evaluate(tree: &CsgTree, config: &EngineConfig) -> Result<Evaluation> {
    let tessellator = PrimitiveTessellator::from_config(config);
    Evaluator::new(&tessellator, config).evaluate(tree)
}
