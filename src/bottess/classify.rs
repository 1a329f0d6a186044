// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tagging faces INSIDE, OUTSIDE, SAME or OPPOSITE relative to another soup

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::soup::{Face, FaceTag, Soup};
use crate::geometry::predicates::ray_triangle;
use crate::geometry::{BoundingBox, Tolerance};

/// Skewed directions so rays rarely graze edges of axis-aligned meshes
const RAY_DIRECTIONS: [[f64; 3]; 3] = [
    [0.9512, 0.2593, 0.1671],
    [-0.2304, 0.9147, 0.3321],
    [0.1877, -0.3419, 0.9208],
];

/// Is `p` inside triangle `face`, given it already lies on the face's plane?
fn on_face(p: &Point3<f64>, face: &Face, tol: &Tolerance) -> bool {
    let n = face.plane.normal;
    (0..3).all(|k| {
        let a = face.vert[k];
        let b = face.vert[(k + 1) % 3];
        let edge = b - a;
        let len = edge.norm();
        if len < tol.dist {
            return true;
        }
        // signed distance from the edge, positive towards the interior
        edge.cross(&(p - a)).dot(&n) / len >= -tol.dist
    })
}

/// SAME or OPPOSITE if the point lies on a face of `other` with a parallel normal
fn boundary_placement(
    p: &Point3<f64>,
    normal: &Vector3<f64>,
    other: &Soup,
    tol: &Tolerance,
) -> Option<FaceTag> {
    other.iter().find_map(|g| {
        if g.plane.distance(p).abs() >= tol.dist || !on_face(p, g, tol) {
            return None;
        }
        let cos = normal.dot(&g.plane.normal);
        if cos >= tol.para() {
            Some(FaceTag::SAME)
        } else if cos <= -tol.para() {
            Some(FaceTag::OPPOSITE)
        } else {
            None
        }
    })
}

/// Ray parity vote: odd crossings mean inside
fn inside(p: &Point3<f64>, other: &Soup, bounds: &BoundingBox, tol: &Tolerance) -> bool {
    if !bounds.fluffed(tol.dist).overlaps(&BoundingBox::new(*p, *p)) {
        return false;
    }

    let votes = RAY_DIRECTIONS
        .iter()
        .filter(|d| {
            let direction = Vector3::from(**d).normalize();
            let crossings = other
                .iter()
                .filter(|g| ray_triangle(p, &direction, &g.vert[0], &g.vert[1], &g.vert[2], tol).is_some())
                .count();
            crossings % 2 == 1
        })
        .count();
    votes >= 2
}

/// Placement of a single point with the given face normal
pub fn classify_point(
    p: &Point3<f64>,
    normal: &Vector3<f64>,
    other: &Soup,
    tol: &Tolerance,
) -> FaceTag {
    if let Some(tag) = boundary_placement(p, normal, other, tol) {
        return tag;
    }
    if inside(p, other, &other.bounding_box(), tol) {
        FaceTag::INSIDE
    } else {
        FaceTag::OUTSIDE
    }
}

/// Tag every face of `target` by where its centroid sits relative to `other`.
///
/// The INVERTED bit of each tag is preserved.
pub fn classify_soup(target: &mut Soup, other: &Soup, tol: &Tolerance) {
    if other.is_empty() {
        for face in target.faces_mut() {
            face.tag = face.tag.with_placement(FaceTag::OUTSIDE);
        }
        return;
    }

    let bounds = other.bounding_box();
    target.faces_mut().par_iter_mut().for_each(|face| {
        let centroid = face.centroid();
        let placement = match boundary_placement(&centroid, &face.plane.normal, other, tol) {
            Some(tag) => tag,
            None if inside(&centroid, other, &bounds, tol) => FaceTag::INSIDE,
            None => FaceTag::OUTSIDE,
        };
        face.tag = face.tag.with_placement(placement);
    });
}
