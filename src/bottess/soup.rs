// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle soup: independent faces with cached planes and boxes

use bitflags::bitflags;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BottessError, Result};
use crate::geometry::{BotMesh, BoundingBox, Orientation, Plane, Tolerance};

/// Padding added to every face box to absorb floating point fuzz
pub const DEFAULT_BBOX_FLUFF: f64 = 0.1;

/// Faces per growth step: one 16 KiB run of pages
pub const FACES_PER_PAGE: usize = 4 * 4096 / std::mem::size_of::<Face>();

bitflags! {
    /// Where a face sits relative to the other operand of a boolean
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FaceTag: u32 {
        const INSIDE = 0x01;
        const OUTSIDE = 0x02;
        /// On the other operand's boundary, normals agree
        const SAME = 0x04;
        /// On the other operand's boundary, normals disagree
        const OPPOSITE = 0x08;
        /// Winding has been reversed an odd number of times
        const INVERTED = 0x10;
    }
}

impl FaceTag {
    /// The placement bits, without the INVERTED bookkeeping bit
    pub fn placement(self) -> Self {
        self - Self::INVERTED
    }

    /// Replace the placement, keeping INVERTED as it was
    pub fn with_placement(self, placement: FaceTag) -> Self {
        (self & Self::INVERTED) | placement.placement()
    }
}

impl Default for FaceTag {
    fn default() -> Self {
        Self::OUTSIDE
    }
}

/// One triangle of a soup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vert: [Point3<f64>; 3],
    /// Fluffed bounding box
    pub bbox: BoundingBox,
    pub plane: Plane,
    pub tag: FaceTag,
}

impl Face {
    /// Face with a plane already known, e.g. inherited from a split parent
    pub fn with_plane(vert: [Point3<f64>; 3], plane: Plane, tag: FaceTag, fluff: f64) -> Self {
        Self {
            vert,
            bbox: BoundingBox::from_points(&vert).fluffed(fluff),
            plane,
            tag,
        }
    }

    /// Face with its plane solved from the corners; `None` if degenerate
    pub fn from_points(
        vert: [Point3<f64>; 3],
        tag: FaceTag,
        tol: &Tolerance,
        fluff: f64,
    ) -> Option<Self> {
        let plane = Plane::from_points(&vert[0], &vert[1], &vert[2], tol)?;
        Some(Self::with_plane(vert, plane, tag, fluff))
    }

    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.vert[0].coords + self.vert[1].coords + self.vert[2].coords) / 3.0)
    }

    pub fn area(&self) -> f64 {
        (self.vert[1] - self.vert[0])
            .cross(&(self.vert[2] - self.vert[0]))
            .norm()
            * 0.5
    }

    /// Reverse winding and plane, toggling INVERTED
    pub fn invert(&mut self) {
        self.vert.swap(0, 1);
        self.plane = self.plane.flipped();
        self.tag.toggle(FaceTag::INVERTED);
    }
}

/// An unordered, unindexed set of faces
#[derive(Debug, Clone, PartialEq)]
pub struct Soup {
    faces: Vec<Face>,
    bbox_fluff: f64,
}

impl Default for Soup {
    fn default() -> Self {
        Self::new(DEFAULT_BBOX_FLUFF)
    }
}

impl Soup {
    pub fn new(bbox_fluff: f64) -> Self {
        Self {
            faces: Vec::new(),
            bbox_fluff,
        }
    }

    /// Soup with room for `faces` faces, rounded up to whole pages
    pub fn with_capacity(faces: usize, bbox_fluff: f64) -> Result<Self> {
        let mut soup = Self::new(bbox_fluff);
        let pages = faces.div_ceil(FACES_PER_PAGE);
        let wanted = pages * FACES_PER_PAGE;
        soup.faces
            .try_reserve_exact(wanted)
            .map_err(|_| BottessError::OutOfMemory(wanted))?;
        Ok(soup)
    }

    /// Convert a counter-clockwise BoT into a soup.
    ///
    /// Every face starts tagged OUTSIDE. Faces too small to have a plane are
    /// dropped with a warning.
    pub fn from_bot(mesh: &BotMesh, name: &str, tol: &Tolerance, bbox_fluff: f64) -> Result<Self> {
        if mesh.orientation != Orientation::Ccw {
            return Err(BottessError::BadOrientation(name.to_string()));
        }
        mesh.validate_indices()?;

        let mut soup = Self::with_capacity(mesh.face_count(), bbox_fluff)?;
        let mut skipped = 0usize;
        for index in 0..mesh.face_count() {
            if soup.add_face(mesh.triangle(index), tol)?.is_none() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!(leaf = name, skipped, "dropped degenerate faces from leaf");
        }
        Ok(soup)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn bbox_fluff(&self) -> f64 {
        self.bbox_fluff
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    pub fn face(&self, index: usize) -> Result<&Face> {
        self.faces
            .get(index)
            .ok_or(BottessError::FaceIndexOutOfRange {
                index,
                len: self.faces.len(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Face> {
        self.faces.iter()
    }

    fn reserve_page(&mut self) -> Result<()> {
        if self.faces.len() < self.faces.capacity() {
            return Ok(());
        }
        self.faces
            .try_reserve_exact(FACES_PER_PAGE)
            .map_err(|_| BottessError::OutOfMemory(self.faces.len() + FACES_PER_PAGE))
    }

    /// Add a face tagged OUTSIDE, solving its plane.
    ///
    /// Returns the new index, or `None` when the corners are degenerate.
    pub fn add_face(&mut self, vert: [Point3<f64>; 3], tol: &Tolerance) -> Result<Option<usize>> {
        match Face::from_points(vert, FaceTag::OUTSIDE, tol, self.bbox_fluff) {
            Some(face) => self.push(face).map(Some),
            None => Ok(None),
        }
    }

    /// Add a face whose plane is already known
    pub fn add_face_precomputed(
        &mut self,
        vert: [Point3<f64>; 3],
        plane: Plane,
        tag: FaceTag,
    ) -> Result<usize> {
        let face = Face::with_plane(vert, plane, tag, self.bbox_fluff);
        self.push(face)
    }

    fn push(&mut self, face: Face) -> Result<usize> {
        self.reserve_page()?;
        self.faces.push(face);
        Ok(self.faces.len() - 1)
    }

    /// Remove a face by moving the last face into its slot
    pub fn remove_face(&mut self, index: usize) -> Result<Face> {
        if index >= self.faces.len() {
            return Err(BottessError::FaceIndexOutOfRange {
                index,
                len: self.faces.len(),
            });
        }
        Ok(self.faces.swap_remove(index))
    }

    /// Reverse every face
    pub fn invert(&mut self) {
        self.faces.iter_mut().for_each(Face::invert);
    }

    /// Flip the INVERTED bit without touching geometry
    pub fn toggle_inverted(&mut self) {
        for face in &mut self.faces {
            face.tag.toggle(FaceTag::INVERTED);
        }
    }

    /// Keep only faces whose placement is one of `keep`
    pub fn retain_tagged(&mut self, keep: FaceTag) {
        self.faces.retain(|face| keep.intersects(face.tag.placement()));
    }

    /// Move every face of `other` into this soup
    pub fn append(&mut self, mut other: Soup) -> Result<()> {
        let extra = other.faces.len();
        if self.faces.capacity() - self.faces.len() < extra {
            let grow = extra.div_ceil(FACES_PER_PAGE) * FACES_PER_PAGE;
            self.faces
                .try_reserve_exact(grow)
                .map_err(|_| BottessError::OutOfMemory(self.faces.len() + grow))?;
        }
        self.faces.append(&mut other.faces);
        Ok(())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.faces.iter().flat_map(|f| f.vert.iter()))
    }

    /// Count faces by placement
    pub fn count_tagged(&self, tag: FaceTag) -> usize {
        self.faces
            .iter()
            .filter(|f| tag.intersects(f.tag.placement()))
            .count()
    }

    /// Rebuild an indexed BoT, welding corners closer than `weld_epsilon`
    pub fn to_mesh(&self, weld_epsilon: f64) -> BotMesh {
        let mut mesh = BotMesh::with_capacity(self.faces.len() * 3, self.faces.len());
        for face in &self.faces {
            let a = mesh.add_vertex(face.vert[0]);
            let b = mesh.add_vertex(face.vert[1]);
            let c = mesh.add_vertex(face.vert[2]);
            mesh.add_face([a, b, c]);
        }
        mesh.weld_vertices(weld_epsilon);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    fn unit_cube_soup() -> Soup {
        let mesh = Primitive::unit_cube(Point3::origin()).to_mesh(0);
        Soup::from_bot(&mesh, "cube", &Tolerance::default(), DEFAULT_BBOX_FLUFF).unwrap()
    }

    #[test]
    fn test_from_bot_tags_outside() {
        let soup = unit_cube_soup();
        assert_eq!(soup.len(), 12);
        assert!(soup.iter().all(|f| f.tag == FaceTag::OUTSIDE));
        assert_relative_eq!(soup.faces()[0].bbox.min.x, -0.1);
    }

    #[test]
    fn test_capacity_grows_by_page() {
        let soup = unit_cube_soup();
        assert!(FACES_PER_PAGE > 0);
        assert!(soup.faces.capacity() >= FACES_PER_PAGE);
    }

    #[test]
    fn test_clockwise_leaf_rejected() {
        let mut mesh = Primitive::unit_cube(Point3::origin()).to_mesh(0);
        mesh.flip();
        let err = Soup::from_bot(&mesh, "cw", &Tolerance::default(), DEFAULT_BBOX_FLUFF)
            .unwrap_err();
        assert_eq!(err, BottessError::BadOrientation("cw".to_string()));
    }

    #[test]
    fn test_degenerate_faces_are_skipped() {
        let mut mesh = Primitive::unit_cube(Point3::origin()).to_mesh(0);
        mesh.add_face([0, 0, 1]);
        let soup = Soup::from_bot(&mesh, "cube", &Tolerance::default(), DEFAULT_BBOX_FLUFF).unwrap();
        assert_eq!(soup.len(), 12);
    }

    #[test]
    fn test_remove_face_swaps_last() {
        let mut soup = unit_cube_soup();
        let last = soup.faces()[11];
        soup.remove_face(3).unwrap();

        assert_eq!(soup.len(), 11);
        assert_eq!(soup.faces()[3], last);
        assert!(matches!(
            soup.remove_face(11),
            Err(BottessError::FaceIndexOutOfRange { index: 11, len: 11 })
        ));
    }

    #[test]
    fn test_invert_twice_restores() {
        let original = unit_cube_soup();
        let mut soup = original.clone();
        soup.invert();

        let face = soup.faces()[0];
        assert!(face.tag.contains(FaceTag::INVERTED));
        assert_relative_eq!(face.plane.normal, -original.faces()[0].plane.normal);

        soup.invert();
        assert_eq!(soup, original);
    }

    #[test]
    fn test_retain_ignores_inverted_bit() {
        let mut soup = unit_cube_soup();
        soup.toggle_inverted();
        soup.faces_mut()[0].tag = FaceTag::INSIDE | FaceTag::INVERTED;

        soup.retain_tagged(FaceTag::OUTSIDE);
        assert_eq!(soup.len(), 11);
    }

    #[test]
    fn test_to_mesh_welds_corners() {
        let mesh = unit_cube_soup().to_mesh(1e-6);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
    }
}
