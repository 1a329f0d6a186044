// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG tree evaluator - turns a boolean tree of leaves into one soup

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument, warn};

use super::classify::classify_soup;
use super::compose::{compose, BoolOp};
use super::soup::Soup;
use super::split::{split_face, SplitSides};
use super::stats::SplitStats;
use crate::config::EngineConfig;
use crate::error::{BottessError, Result};
use crate::geometry::{BotMesh, Orientation, Primitive, Tolerance};
use crate::trimesh::solid_report;

/// A named primitive at the bottom of a CSG tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub name: String,
    pub primitive: Primitive,
    /// Placement applied after tessellation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Matrix4<f64>>,
}

impl Leaf {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Binary boolean tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CsgTree {
    Leaf(Leaf),
    Union {
        left: Box<CsgTree>,
        right: Box<CsgTree>,
    },
    Intersect {
        left: Box<CsgTree>,
        right: Box<CsgTree>,
    },
    Subtract {
        left: Box<CsgTree>,
        right: Box<CsgTree>,
    },
    /// Contributes nothing
    Nop,
}

impl CsgTree {
    pub fn leaf(name: impl Into<String>, primitive: Primitive) -> Self {
        Self::Leaf(Leaf::new(name, primitive))
    }

    pub fn union(left: CsgTree, right: CsgTree) -> Self {
        Self::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn intersect(left: CsgTree, right: CsgTree) -> Self {
        Self::Intersect {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn subtract(left: CsgTree, right: CsgTree) -> Self {
        Self::Subtract {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, Self::Nop)
    }

    /// Operator and operands of an interior node
    pub fn operands(&self) -> Option<(BoolOp, &CsgTree, &CsgTree)> {
        match self {
            Self::Union { left, right } => Some((BoolOp::Union, left, right)),
            Self::Intersect { left, right } => Some((BoolOp::Intersect, left, right)),
            Self::Subtract { left, right } => Some((BoolOp::Subtract, left, right)),
            Self::Leaf(_) | Self::Nop => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Nop => 0,
            _ => self
                .operands()
                .map_or(0, |(_, l, r)| l.leaf_count() + r.leaf_count()),
        }
    }
}

/// Turns a leaf into a closed, counter-clockwise BoT
pub trait LeafTessellator: Send + Sync {
    fn tessellate(&self, leaf: &Leaf) -> Result<BotMesh>;
}

/// Tessellates the built-in primitives
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveTessellator {
    pub default_segments: u32,
}

impl PrimitiveTessellator {
    pub fn new(default_segments: u32) -> Self {
        Self { default_segments }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sphere_segments)
    }
}

impl LeafTessellator for PrimitiveTessellator {
    fn tessellate(&self, leaf: &Leaf) -> Result<BotMesh> {
        if let Some(reason) = leaf.primitive.invalid_reason() {
            return Err(BottessError::Tessellation {
                name: leaf.name.clone(),
                reason: reason.to_string(),
            });
        }

        let mut mesh = leaf.primitive.to_mesh(self.default_segments);
        if let Some(transform) = &leaf.transform {
            mesh.transform(transform);
            // a mirroring placement turns the winding inside out
            if transform.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0 {
                mesh.flip();
                mesh.orientation = Orientation::Ccw;
            }
        }
        Ok(mesh)
    }
}

/// Shared cap on the number of face pairs tested
#[derive(Debug, Default)]
pub struct PairBudget {
    limit: Option<u64>,
    used: AtomicU64,
}

impl PairBudget {
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            limit,
            used: AtomicU64::new(0),
        }
    }

    /// Account for one pair test
    pub fn charge(&self) -> Result<()> {
        let used = self.used.fetch_add(1, Ordering::Relaxed) + 1;
        match self.limit {
            Some(limit) if used > limit => Err(BottessError::BudgetExceeded(limit)),
            _ => Ok(()),
        }
    }

    pub fn used(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }
}

/// Split every intersecting pair of faces between `left` and `right`.
///
/// When a face is split its slot is refilled with a child, so the slot is
/// tested again instead of advancing.
pub fn split_faces(
    left: &mut Soup,
    right: &mut Soup,
    tol: &Tolerance,
    strict: bool,
    budget: &PairBudget,
    stats: &mut SplitStats,
) -> Result<()> {
    let mut i = 0;
    while i < left.len() {
        let mut j = 0;
        let mut retest_left = false;

        while j < right.len() {
            if !left.faces()[i].bbox.overlaps(&right.faces()[j].bbox) {
                j += 1;
                continue;
            }

            budget.charge()?;
            let sides = split_face(left, i, right, j, tol, strict, stats)?;
            if sides.contains(SplitSides::LEFT) {
                retest_left = true;
                break;
            }
            if !sides.contains(SplitSides::RIGHT) {
                j += 1;
            }
        }

        if !retest_left {
            i += 1;
        }
    }
    Ok(())
}

/// Soup produced by evaluating a tree
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub soup: Soup,
    pub stats: SplitStats,
}

/// Bottom-up tree evaluator
pub struct Evaluator<'a> {
    tessellator: &'a dyn LeafTessellator,
    config: &'a EngineConfig,
    budget: PairBudget,
}

impl<'a> Evaluator<'a> {
    pub fn new(tessellator: &'a dyn LeafTessellator, config: &'a EngineConfig) -> Self {
        Self {
            tessellator,
            config,
            budget: PairBudget::new(config.pair_budget),
        }
    }

    /// Evaluate `tree`; a `Nop` tree gives an empty soup
    #[instrument(skip_all, fields(leaves = tree.leaf_count()))]
    pub fn evaluate(&self, tree: &CsgTree) -> Result<Evaluation> {
        let (soup, stats) = self.evaluate_node(tree)?;
        debug!(faces = soup.len(), pairs = self.budget.used(), "evaluation finished");
        Ok(Evaluation { soup, stats })
    }

    fn evaluate_node(&self, tree: &CsgTree) -> Result<(Soup, SplitStats)> {
        match tree {
            CsgTree::Nop => Ok((Soup::new(self.config.bbox_fluff), SplitStats::default())),
            CsgTree::Leaf(leaf) => Ok((self.leaf_soup(leaf)?, SplitStats::default())),
            CsgTree::Union { left, right } => self.evaluate_boolean(left, right, BoolOp::Union),
            CsgTree::Intersect { left, right } => {
                self.evaluate_boolean(left, right, BoolOp::Intersect)
            }
            CsgTree::Subtract { left, right } => {
                self.evaluate_boolean(left, right, BoolOp::Subtract)
            }
        }
    }

    fn leaf_soup(&self, leaf: &Leaf) -> Result<Soup> {
        let mesh = self.tessellator.tessellate(leaf)?;
        if mesh.is_empty() {
            return Err(BottessError::EmptyLeaf(leaf.name.clone()));
        }
        mesh.validate_indices()?;

        if self.config.check_leaves {
            let verdict = solid_report(&mesh.vertices, &mesh.faces, None);
            if !verdict.is_solid() {
                warn!(leaf = %leaf.name, flags = ?verdict.flags, "leaf is not a closed solid");
            }
        }

        let soup = Soup::from_bot(&mesh, &leaf.name, &self.config.tolerance, self.config.bbox_fluff)?;
        debug!(leaf = %leaf.name, faces = soup.len(), "tessellated leaf");
        Ok(soup)
    }

    fn evaluate_boolean(
        &self,
        left: &CsgTree,
        right: &CsgTree,
        op: BoolOp,
    ) -> Result<(Soup, SplitStats)> {
        let (left, right) = if self.config.parallel {
            rayon::join(|| self.evaluate_node(left), || self.evaluate_node(right))
        } else {
            (self.evaluate_node(left), self.evaluate_node(right))
        };
        let (mut left, left_stats) = left?;
        let (mut right, right_stats) = right?;
        let mut stats = left_stats.merged(&right_stats);

        let tol = &self.config.tolerance;
        split_faces(
            &mut left,
            &mut right,
            tol,
            self.config.strict_splits,
            &self.budget,
            &mut stats,
        )?;
        classify_soup(&mut left, &right, tol);
        classify_soup(&mut right, &left, tol);

        let soup = compose(left, right, op)?;
        debug!(%op, faces = soup.len(), "composed");
        Ok((soup, stats))
    }
}
