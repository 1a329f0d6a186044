// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Distance and angular tolerances shared by all geometric predicates

use serde::{Deserialize, Serialize};

/// Calculational tolerances.
///
/// `dist` is the distance below which two points are considered coincident
/// and a signed distance is considered zero. `perp` is a cosine tolerance:
/// two unit vectors are parallel when `|cos| >= 1 - perp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub dist: f64,
    pub perp: f64,
}

impl Tolerance {
    pub fn new(dist: f64, perp: f64) -> Self {
        Self { dist, perp }
    }

    /// Squared distance tolerance
    pub fn dist_sq(&self) -> f64 {
        self.dist * self.dist
    }

    /// `value` lies strictly within `(-dist, dist)`
    pub fn near_zero(&self, value: f64) -> bool {
        value > -self.dist && value < self.dist
    }

    /// Cosine above which two unit vectors count as parallel
    pub fn para(&self) -> f64 {
        1.0 - self.perp
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            dist: 0.0005,
            perp: 1e-6,
        }
    }
}
