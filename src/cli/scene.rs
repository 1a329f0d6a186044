// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON inputs for the command line tool and the reports it prints

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bottess::{Region, WalkSummary};
use crate::geometry::BotMesh;
use crate::trimesh::{closed_fan, orientable, solid_report, validate_indices, DefectFlags, SolidErrors};

/// Load a BoT from `{"vertices": [[x, y, z], ...], "faces": [[a, b, c], ...]}`
pub fn load_mesh(path: impl AsRef<Path>) -> Result<BotMesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mesh file: {:?}", path))?;
    let mesh: BotMesh = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse mesh file: {:?}", path))?;
    validate_indices(mesh.vertex_count(), &mesh.faces)
        .with_context(|| format!("Bad face in mesh file: {:?}", path))?;
    Ok(mesh)
}

/// A batch of regions to evaluate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub regions: Vec<Region>,
}

impl Scene {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scene file: {:?}", path))
    }
}

/// Solidity check of one mesh file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub timestamp: String,
    pub file: String,
    pub vertices: usize,
    pub faces: usize,
    pub solid: bool,
    pub flags: DefectFlags,
    pub defects: usize,
    pub closed_fan: bool,
    pub orientable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<SolidErrors>,
}

impl CheckReport {
    /// Run the check; `itemize` gathers every defect instead of stopping at the first
    pub fn run(file: &str, mesh: &BotMesh, itemize: bool) -> Self {
        let mut errors = itemize.then(SolidErrors::new);
        let verdict = solid_report(&mesh.vertices, &mesh.faces, errors.as_mut());

        Self {
            timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            file: file.to_string(),
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            solid: verdict.is_solid(),
            flags: verdict.flags,
            defects: verdict.defects,
            closed_fan: closed_fan(&mesh.vertices, &mesh.faces),
            orientable: orientable(&mesh.vertices, &mesh.faces),
            errors,
        }
    }
}

/// Walk of one scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub timestamp: String,
    pub file: String,
    pub summary: WalkSummary,
}

impl EvalReport {
    pub fn new(file: &str, summary: WalkSummary) -> Self {
        Self {
            timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            file: file.to_string(),
            summary,
        }
    }
}
