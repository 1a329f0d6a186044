// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Splitting faces along intersection segments

use bitflags::bitflags;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{trace, warn};

use super::intersect::{tri_tri_intersect_with_isectline, TriTriHit};
use super::soup::{Face, Soup};
use super::stats::SplitStats;
use crate::error::{BottessError, Result};
use crate::geometry::predicates::{isect_pt_lseg, SegmentHit};
use crate::geometry::Tolerance;

/// Where a segment endpoint lies on a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// On corner `k`
    Vertex(usize),
    /// Inside edge `k -> k + 1`
    Line(usize),
    /// Inside the face; never computed, only inferred
    Face,
}

impl EndpointKind {
    fn rank(self) -> u8 {
        match self {
            Self::Vertex(_) => 0,
            Self::Line(_) => 1,
            Self::Face => 2,
        }
    }
}

/// Endpoint pairings the splitter does not cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitShape {
    VertexFace,
    LineLine,
    LineFace,
    FaceFace,
}

impl fmt::Display for SplitShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VertexFace => "vertex+face",
            Self::LineLine => "line+line",
            Self::LineFace => "line+face",
            Self::FaceFace => "face+face",
        };
        f.write_str(name)
    }
}

/// What `split_face_single` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The segment already runs along existing edges
    NoOp,
    /// The face was replaced by this many children
    Split(usize),
}

bitflags! {
    /// Which of the two faces handed to `split_face` were replaced
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SplitSides: u8 {
        const LEFT = 0x1;
        const RIGHT = 0x2;
    }
}

/// Classify `p` against the edges of `face`; the first edge that claims it wins
pub fn classify_endpoint(face: &Face, p: &Point3<f64>, tol: &Tolerance) -> EndpointKind {
    for j in 0..3 {
        let next = (j + 1) % 3;
        match isect_pt_lseg(p, &face.vert[j], &face.vert[next], tol) {
            SegmentHit::OffLine | SegmentHit::OffSegment => continue,
            SegmentHit::AtStart => return EndpointKind::Vertex(j),
            SegmentHit::AtEnd => return EndpointKind::Vertex(next),
            SegmentHit::Interior(_) => return EndpointKind::Line(j),
        }
    }
    EndpointKind::Face
}

/// Cut face `fid` of `soup` along `segment`.
///
/// Only a segment from a corner to the opposite edge is cut: the face is
/// replaced by two children keeping its winding, plane and tag, and the
/// parent's slot is refilled by swap-removal. Shapes that would need three
/// children are reported as [`BottessError::UnsupportedSplit`].
pub fn split_face_single(
    soup: &mut Soup,
    fid: usize,
    segment: &[Point3<f64>; 2],
    tol: &Tolerance,
) -> Result<SplitOutcome> {
    let face = *soup.face(fid)?;

    let mut ends = [
        (classify_endpoint(&face, &segment[0], tol), segment[0]),
        (classify_endpoint(&face, &segment[1], tol), segment[1]),
    ];
    if ends[0].0.rank() > ends[1].0.rank() {
        ends.swap(0, 1);
    }

    use EndpointKind::{Face as OnFace, Line, Vertex};
    let shape = match (ends[0].0, ends[1].0) {
        (Vertex(_), Vertex(_)) => return Ok(SplitOutcome::NoOp),
        (Vertex(k), Line(edge)) => {
            let (next, last) = ((k + 1) % 3, (k + 2) % 3);
            if edge != next {
                // the segment lies along an edge touching corner k
                return Ok(SplitOutcome::NoOp);
            }
            let p = ends[1].1;
            soup.add_face_precomputed([face.vert[k], face.vert[next], p], face.plane, face.tag)?;
            soup.add_face_precomputed([face.vert[k], p, face.vert[last]], face.plane, face.tag)?;
            soup.remove_face(fid)?;
            return Ok(SplitOutcome::Split(2));
        }
        (Vertex(_), OnFace) => SplitShape::VertexFace,
        (Line(_), Line(_)) => SplitShape::LineLine,
        (Line(_), OnFace) => SplitShape::LineFace,
        // sorted by rank, so only face+face is left
        _ => SplitShape::FaceFace,
    };
    Err(BottessError::UnsupportedSplit(shape))
}

/// Fold one split attempt into `stats`; unsupported shapes are soft failures
/// unless `strict`.
fn settle(outcome: Result<SplitOutcome>, strict: bool, stats: &mut SplitStats) -> Result<bool> {
    match outcome {
        Ok(SplitOutcome::Split(_)) => {
            stats.faces_split += 1;
            Ok(true)
        }
        Ok(SplitOutcome::NoOp) => Ok(false),
        Err(BottessError::UnsupportedSplit(shape)) if !strict => {
            stats.unsupported.record(shape);
            warn!(%shape, "face left unsplit");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Intersect `left[li]` with `right[ri]` and split both along the segment.
pub fn split_face(
    left: &mut Soup,
    li: usize,
    right: &mut Soup,
    ri: usize,
    tol: &Tolerance,
    strict: bool,
    stats: &mut SplitStats,
) -> Result<SplitSides> {
    stats.pair_tests += 1;

    let lf = *left.face(li)?;
    let rf = *right.face(ri)?;

    let segment = match tri_tri_intersect_with_isectline(&lf, &rf, tol) {
        TriTriHit::Segment(seg) if (seg[0] - seg[1]).norm_squared() >= tol.dist_sq() => seg,
        TriTriHit::Coplanar { overlap: true } => {
            stats.coplanar += 1;
            return Ok(SplitSides::empty());
        }
        _ => return Ok(SplitSides::empty()),
    };
    stats.intersecting += 1;
    trace!(li, ri, ?segment, "faces intersect");

    let mut sides = SplitSides::empty();
    if settle(split_face_single(left, li, &segment, tol), strict, stats)? {
        sides |= SplitSides::LEFT;
    }
    if settle(split_face_single(right, ri, &segment, tol), strict, stats)? {
        sides |= SplitSides::RIGHT;
    }
    Ok(sides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bottess::soup::{FaceTag, DEFAULT_BBOX_FLUFF};
    use approx::assert_relative_eq;

    fn soup_of(vert: [[f64; 3]; 3]) -> Soup {
        let mut soup = Soup::new(DEFAULT_BBOX_FLUFF);
        soup.add_face(vert.map(Point3::from), &Tolerance::default())
            .unwrap()
            .unwrap();
        soup
    }

    fn base() -> Soup {
        soup_of([[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]])
    }

    #[test]
    fn test_classify_endpoint() {
        let soup = base();
        let face = &soup.faces()[0];
        let tol = Tolerance::default();

        assert_eq!(classify_endpoint(face, &Point3::new(2.0, 0.0, 0.0), &tol), EndpointKind::Vertex(1));
        assert_eq!(classify_endpoint(face, &Point3::new(1.0, 0.0, 0.0), &tol), EndpointKind::Line(0));
        assert_eq!(classify_endpoint(face, &Point3::new(0.0, 1.0, 0.0), &tol), EndpointKind::Line(2));
        assert_eq!(classify_endpoint(face, &Point3::new(0.5, 0.5, 0.0), &tol), EndpointKind::Face);
    }

    #[test]
    fn test_vertex_line_splits_in_two() {
        let mut soup = base();
        soup.faces_mut()[0].tag = FaceTag::INSIDE;
        let parent_normal = soup.faces()[0].plane.normal;
        let segment = [Point3::new(1.0, 1.0, 0.0), Point3::new(0.0, 0.0, 0.0)];

        let outcome = split_face_single(&mut soup, 0, &segment, &Tolerance::default()).unwrap();

        assert_eq!(outcome, SplitOutcome::Split(2));
        assert_eq!(soup.len(), 2);
        for face in soup.iter() {
            assert_relative_eq!(face.area(), 1.0, epsilon = 1e-12);
            assert_eq!(face.tag, FaceTag::INSIDE);
            let winding = (face.vert[1] - face.vert[0]).cross(&(face.vert[2] - face.vert[0]));
            assert!(winding.dot(&parent_normal) > 0.0);
        }
    }

    #[test]
    fn test_segment_along_edge_is_noop() {
        let mut soup = base();
        let tol = Tolerance::default();

        let corners = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        assert_eq!(split_face_single(&mut soup, 0, &corners, &tol).unwrap(), SplitOutcome::NoOp);

        let half_edge = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(split_face_single(&mut soup, 0, &half_edge, &tol).unwrap(), SplitOutcome::NoOp);
        assert_eq!(soup.len(), 1);
    }

    #[test]
    fn test_unsupported_shapes() {
        let mut soup = base();
        let tol = Tolerance::default();
        let cases = [
            ([Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)], SplitShape::LineLine),
            ([Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 0.5, 0.0)], SplitShape::VertexFace),
            ([Point3::new(0.5, 0.5, 0.0), Point3::new(1.0, 0.0, 0.0)], SplitShape::LineFace),
            ([Point3::new(0.2, 0.2, 0.0), Point3::new(0.5, 0.5, 0.0)], SplitShape::FaceFace),
        ];

        for (segment, shape) in cases {
            let err = split_face_single(&mut soup, 0, &segment, &tol).unwrap_err();
            assert_eq!(err, BottessError::UnsupportedSplit(shape));
        }
        assert_eq!(soup.len(), 1);
        assert!(split_face_single(&mut soup, 3, &cases[0].0, &tol).is_err());
    }

    fn diagonal_wall() -> Soup {
        soup_of([[-1.0, -1.0, -1.0], [3.0, 3.0, -1.0], [1.0, 1.0, 3.0]])
    }

    #[test]
    fn test_split_face_pair() {
        let mut left = base();
        let mut right = diagonal_wall();
        let mut stats = SplitStats::default();

        let sides = split_face(&mut left, 0, &mut right, 0, &Tolerance::default(), false, &mut stats)
            .unwrap();

        assert_eq!(sides, SplitSides::LEFT);
        assert_eq!(left.len(), 2);
        assert_eq!(right.len(), 1);
        assert_eq!(stats.pair_tests, 1);
        assert_eq!(stats.intersecting, 1);
        assert_eq!(stats.faces_split, 1);
        assert_eq!(stats.unsupported.face_face, 1);
    }

    #[test]
    fn test_unsupported_counts_every_attempt() {
        // a small upright blade through the middle of a large floor
        let mut left = soup_of([[-5.0, -5.0, 0.0], [5.0, -5.0, 0.0], [0.0, 5.0, 0.0]]);
        let mut right = soup_of([[-1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 0.0, 1.0]]);
        let tol = Tolerance::default();
        let mut stats = SplitStats::default();

        for _ in 0..2 {
            let sides = split_face(&mut left, 0, &mut right, 0, &tol, false, &mut stats).unwrap();
            assert!(sides.is_empty());
        }

        assert_eq!((left.len(), right.len()), (1, 1));
        assert_eq!(stats.pair_tests, 2);
        assert_eq!(stats.faces_split, 0);
        assert_eq!(stats.unsupported.face_face, 2);
        assert_eq!(stats.unsupported.line_line, 2);
    }

    #[test]
    fn test_strict_split_propagates() {
        let mut left = base();
        let mut right = diagonal_wall();
        let mut stats = SplitStats::default();

        let err = split_face(&mut left, 0, &mut right, 0, &Tolerance::default(), true, &mut stats)
            .unwrap_err();
        assert_eq!(err, BottessError::UnsupportedSplit(SplitShape::FaceFace));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(SplitShape::VertexFace.to_string(), "vertex+face");
        assert_eq!(SplitShape::FaceFace.to_string(), "face+face");
    }
}
