// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face retention rules for the three boolean operators

use serde::{Deserialize, Serialize};
use std::fmt;

use super::soup::{FaceTag, Soup};
use crate::error::Result;

/// Boolean operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    Union,
    Intersect,
    Subtract,
}

impl BoolOp {
    /// Placements kept from the left and right operands
    pub fn retention(self) -> (FaceTag, FaceTag) {
        match self {
            Self::Union => (FaceTag::OUTSIDE | FaceTag::SAME, FaceTag::OUTSIDE),
            Self::Intersect => (FaceTag::INSIDE | FaceTag::SAME, FaceTag::INSIDE),
            Self::Subtract => (FaceTag::OUTSIDE | FaceTag::OPPOSITE, FaceTag::INSIDE),
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Intersect => write!(f, "intersect"),
            Self::Subtract => write!(f, "subtract"),
        }
    }
}

/// Merge two classified soups into the result of `left op right`.
///
/// For subtraction the right operand is turned inside out first, and the
/// INVERTED bit of the whole result is toggled afterwards.
pub fn compose(mut left: Soup, mut right: Soup, op: BoolOp) -> Result<Soup> {
    if op == BoolOp::Subtract {
        right.invert();
    }

    let (keep_left, keep_right) = op.retention();
    left.retain_tagged(keep_left);
    right.retain_tagged(keep_right);
    left.append(right)?;

    if op == BoolOp::Subtract {
        left.toggle_inverted();
    }
    Ok(left)
}
