// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solidity, closed-fan and orientability queries
//!
//! These are queries, not commands: malformed input yields "not solid" rather
//! than an error, and defects are returned as data.

use bitflags::bitflags;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::defects::{count_error_edges, degenerate_faces, edge_exit, face_exit, EdgeDefect};
use super::halfedge::{edge_runs, generate_edge_list};
use super::report::SolidErrors;

/// A closed solid needs at least a tetrahedron's worth of faces and vertices
pub const MIN_SOLID_FACES: usize = 4;
pub const MIN_SOLID_VERTICES: usize = 4;

bitflags! {
    /// Defect categories present in a mesh; empty means solid
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DefectFlags: u8 {
        /// Too small or empty to be a closed solid
        const INVALID_INPUT = 1 << 0;
        const DEGENERATE = 1 << 1;
        const UNMATCHED = 1 << 2;
        const MISORIENTED = 1 << 3;
        const EXCESS = 1 << 4;
    }
}

impl From<EdgeDefect> for DefectFlags {
    fn from(defect: EdgeDefect) -> Self {
        match defect {
            EdgeDefect::Unmatched => Self::UNMATCHED,
            EdgeDefect::Misoriented => Self::MISORIENTED,
            EdgeDefect::Excess => Self::EXCESS,
        }
    }
}

/// Outcome of a solidity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolidVerdict {
    pub flags: DefectFlags,
    /// Number of defect cases found. Rejected input counts as one. A fast
    /// check stops at the first case, so only a reporting check gives totals.
    pub defects: usize,
}

impl SolidVerdict {
    fn solid() -> Self {
        Self::default()
    }

    fn rejected() -> Self {
        Self {
            flags: DefectFlags::INVALID_INPUT,
            defects: 1,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.flags.is_empty()
    }
}

const EDGE_DEFECTS: [EdgeDefect; 3] = [
    EdgeDefect::Unmatched,
    EdgeDefect::Misoriented,
    EdgeDefect::Excess,
];

/// Check that `faces` bound a closed, consistently oriented 2-manifold.
///
/// Without `errors` the check fails fast: it stops at the first defect of any
/// kind and also rejects an odd half-edge count up front. With `errors` the
/// odd-count shortcut is skipped and every defect category is gathered into
/// the report, which is cleared first.
///
/// Degenerate faces are checked before anything else and end the check, since
/// edge topology is meaningless around them.
pub fn solid_report(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    mut errors: Option<&mut SolidErrors>,
) -> SolidVerdict {
    if vertices.len() < MIN_SOLID_VERTICES || faces.len() < MIN_SOLID_FACES {
        return SolidVerdict::rejected();
    }
    if errors.is_none() && (3 * faces.len()) % 2 != 0 {
        return SolidVerdict::rejected();
    }

    let degenerate = match errors.as_deref_mut() {
        Some(report) => {
            report.clear();
            degenerate_faces(faces, |face| report.degenerate.gather(face))
        }
        None => degenerate_faces(faces, face_exit),
    };
    if degenerate > 0 {
        return SolidVerdict {
            flags: DefectFlags::DEGENERATE,
            defects: degenerate,
        };
    }

    let Some(edges) = generate_edge_list(faces) else {
        return SolidVerdict::rejected();
    };

    let Some(report) = errors else {
        return EDGE_DEFECTS
            .into_iter()
            .find(|&defect| count_error_edges(&edges, defect, edge_exit) > 0)
            .map(|defect| SolidVerdict {
                flags: defect.into(),
                defects: 1,
            })
            .unwrap_or_else(SolidVerdict::solid);
    };

    let mut verdict = SolidVerdict::solid();
    for defect in EDGE_DEFECTS {
        let list = match defect {
            EdgeDefect::Unmatched => &mut report.unmatched,
            EdgeDefect::Misoriented => &mut report.misoriented,
            EdgeDefect::Excess => &mut report.excess,
        };
        let cases = count_error_edges(&edges, defect, |edge| list.gather(edge));
        if cases > 0 {
            verdict.flags |= defect.into();
            verdict.defects += cases;
        }
    }
    verdict
}

/// Total defect count; zero means solid.
///
/// When `bad_edges` is given it receives every defective half-edge as
/// `(va, vb)`: unmatched first, then misoriented, then excess.
pub fn solid(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    bad_edges: Option<&mut Vec<(usize, usize)>>,
) -> usize {
    match bad_edges {
        Some(out) => {
            let mut errors = SolidErrors::new();
            let verdict = solid_report(vertices, faces, Some(&mut errors));
            out.clear();
            out.extend(errors.bad_edges());
            verdict.defects
        }
        None => solid_report(vertices, faces, None).defects,
    }
}

/// Every edge is shared by exactly two faces. Winding is not checked.
pub fn closed_fan(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> bool {
    if vertices.len() < MIN_SOLID_VERTICES
        || faces.len() < MIN_SOLID_FACES
        || (3 * faces.len()) % 2 != 0
    {
        return false;
    }

    match generate_edge_list(faces) {
        Some(edges) => edge_runs(&edges).all(|run| run.len() == 2),
        None => false,
    }
}

/// Shared edges are walked in opposite directions and no edge has more than
/// two faces. Boundary edges are allowed, so open surfaces may be orientable.
pub fn orientable(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> bool {
    if vertices.len() < MIN_SOLID_VERTICES || faces.len() < MIN_SOLID_FACES {
        return false;
    }

    match generate_edge_list(faces) {
        Some(edges) => edge_runs(&edges).all(|run| match run {
            [_] => true,
            [a, b] => a.flipped != b.flipped,
            _ => false,
        }),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_tetrahedron_is_solid() {
        let (v, f) = tetrahedron();
        let verdict = solid_report(&v, &f, None);

        assert!(verdict.is_solid());
        assert_eq!(verdict.defects, 0);
        assert_eq!(solid(&v, &f, None), 0);
        assert!(closed_fan(&v, &f));
        assert!(orientable(&v, &f));
    }

    #[test]
    fn test_too_few_faces_rejected() {
        let (v, f) = tetrahedron();
        let cup = &f[..3];

        assert_eq!(solid_report(&v, cup, None).flags, DefectFlags::INVALID_INPUT);
        assert!(!closed_fan(&v, cup));
        assert!(!orientable(&v, cup));
        assert!(!solid_report(&[], &[], None).is_solid());
    }

    #[test]
    fn test_degenerate_face_fails_first() {
        let (v, mut f) = tetrahedron();
        f.push([1, 1, 2]);
        f.push([3, 2, 2]);

        let mut errors = SolidErrors::new();
        let verdict = solid_report(&v, &f, Some(&mut errors));

        assert_eq!(verdict.flags, DefectFlags::DEGENERATE);
        assert_eq!(verdict.defects, 2);
        assert_eq!(errors.degenerate.faces, vec![4, 5]);
        assert!(errors.unmatched.is_empty());
    }

    #[test]
    fn test_odd_half_edge_count_only_fails_fast_check() {
        let (v, mut f) = tetrahedron();
        // fifth face duplicates an existing one: 15 half-edges
        f.push([0, 2, 1]);

        assert_eq!(solid_report(&v, &f, None).flags, DefectFlags::INVALID_INPUT);

        let mut errors = SolidErrors::new();
        let verdict = solid_report(&v, &f, Some(&mut errors));
        assert!(verdict.flags.contains(DefectFlags::EXCESS));
        assert!(!verdict.flags.contains(DefectFlags::INVALID_INPUT));
    }

    #[test]
    fn test_flipped_face_reports_three_misoriented_pairs() {
        let (v, mut f) = tetrahedron();
        f[3].swap(1, 2);

        let mut errors = SolidErrors::new();
        let verdict = solid_report(&v, &f, Some(&mut errors));

        assert_eq!(verdict.flags, DefectFlags::MISORIENTED);
        assert_eq!(verdict.defects, 3);
        assert_eq!(errors.misoriented.count(), 6);
        assert!(closed_fan(&v, &f));
        assert!(!orientable(&v, &f));
    }

    #[test]
    fn test_fast_check_short_circuits() {
        let (v, mut f) = tetrahedron();
        f.pop();
        f.push([1, 2, 3]);
        f[0].swap(1, 2);

        let verdict = solid_report(&v, &f, None);
        assert_eq!(verdict.defects, 1);
        assert_eq!(verdict.flags.bits().count_ones(), 1);
    }

    #[test]
    fn test_report_is_cleared_between_calls() {
        let (v, mut f) = tetrahedron();
        f[0].swap(1, 2);
        let mut errors = SolidErrors::new();
        solid_report(&v, &f, Some(&mut errors));
        assert!(!errors.is_empty());

        let (v, f) = tetrahedron();
        let verdict = solid_report(&v, &f, Some(&mut errors));
        assert!(verdict.is_solid());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_legacy_bad_edge_list() {
        let (mut v, mut f) = tetrahedron();
        v.push(Point3::new(1.0, 1.0, 1.0));
        // the last face now hangs off (1, 2) the wrong way round
        f.pop();
        f.push([2, 1, 4]);

        let mut bad = Vec::new();
        let count = solid(&v, &f, Some(&mut bad));

        assert_eq!(count, 5);
        assert_eq!(bad, vec![(1, 3), (1, 4), (2, 3), (2, 4), (1, 2), (1, 2)]);
    }
}
