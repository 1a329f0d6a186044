// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - tolerances, planes, boxes and the BoT mesh

mod bbox;
mod mesh;
mod plane;
pub mod predicates;
mod primitives;
mod tolerance;

pub use bbox::BoundingBox;
pub use mesh::{validate_indices, BotMesh, Orientation};
pub use plane::Plane;
pub use primitives::Primitive;
pub use tolerance::Tolerance;
