// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Plane equations in Hessian normal form

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Tolerance;

/// Plane `normal · X = dist` with a unit normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub dist: f64,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, dist: f64) -> Self {
        Self { normal, dist }
    }

    /// Plane through three points, wound so that `(b - a) x (c - a)` is the normal.
    ///
    /// Returns `None` when two points coincide within tolerance or the points
    /// are collinear.
    pub fn from_points(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
        tol: &Tolerance,
    ) -> Option<Self> {
        let ab = b - a;
        let ac = c - a;
        let bc = c - b;
        if ab.norm_squared() < tol.dist_sq()
            || ac.norm_squared() < tol.dist_sq()
            || bc.norm_squared() < tol.dist_sq()
        {
            return None;
        }

        let cross = ab.cross(&ac);
        let len = cross.norm();
        if len < f64::EPSILON {
            return None;
        }

        let normal = cross / len;
        Some(Self {
            normal,
            dist: normal.dot(&a.coords),
        })
    }

    /// Signed distance from `point` to the plane (positive on the normal side)
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.dist
    }

    /// Same plane, opposite side
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            dist: -self.dist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_from_points() {
        let tol = Tolerance::default();
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 2.0),
            &Point3::new(1.0, 0.0, 2.0),
            &Point3::new(0.0, 1.0, 2.0),
            &tol,
        )
        .unwrap();

        assert_relative_eq!(plane.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.dist, 2.0);
        assert_relative_eq!(plane.distance(&Point3::new(5.0, 5.0, 3.0)), 1.0);
        assert_relative_eq!(plane.flipped().distance(&Point3::new(5.0, 5.0, 3.0)), -1.0);
    }

    #[test]
    fn test_collinear_points_have_no_plane() {
        let tol = Tolerance::default();
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0),
            &tol,
        );
        assert!(plane.is_none());
    }
}
