// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-region driver and region output sinks

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::{error, info, instrument};

use super::soup::Soup;
use super::stats::SplitStats;
use super::tree::{CsgTree, Evaluation, Evaluator, LeafTessellator, PrimitiveTessellator};
use crate::config::EngineConfig;
use crate::error::{BottessError, Result};

/// Receives the evaluated soup of each region
pub trait RegionWriter {
    fn write_region(&mut self, path: &str, soup: &Soup) -> Result<()>;
}

/// Writes each region as a plain-text facet listing
pub struct TextFacetWriter<W: Write> {
    out: W,
}

impl<W: Write> TextFacetWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn write_facets(out: &mut impl Write, path: &str, soup: &Soup) -> io::Result<()> {
    writeln!(out, "solid {}", path)?;
    for face in soup.iter() {
        let n = face.plane.normal;
        writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
        writeln!(out, "    outer loop")?;
        for v in &face.vert {
            writeln!(out, "      vertex {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {}", path)?;
    out.flush()
}

impl<W: Write> RegionWriter for TextFacetWriter<W> {
    fn write_region(&mut self, path: &str, soup: &Soup) -> Result<()> {
        write_facets(&mut self.out, path, soup).map_err(|e| BottessError::Output {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Keeps every region's soup in memory
#[derive(Debug, Default)]
pub struct CollectingWriter {
    pub regions: Vec<(String, Soup)>,
}

impl CollectingWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegionWriter for CollectingWriter {
    fn write_region(&mut self, path: &str, soup: &Soup) -> Result<()> {
        self.regions.push((path.to_string(), soup.clone()));
        Ok(())
    }
}

/// Evaluate one region and hand the result to `sink`.
///
/// A `Nop` tree produces nothing and returns `Ok(None)`.
#[instrument(skip(tree, tessellator, config, sink), fields(leaves = tree.leaf_count()))]
pub fn region_end(
    path: &str,
    tree: &CsgTree,
    tessellator: &dyn LeafTessellator,
    config: &EngineConfig,
    sink: &mut dyn RegionWriter,
) -> Result<Option<Evaluation>> {
    if tree.is_nop() {
        return Ok(None);
    }

    let evaluation = Evaluator::new(tessellator, config).evaluate(tree)?;
    sink.write_region(path, &evaluation.soup)?;
    info!(
        faces = evaluation.soup.len(),
        pairs = evaluation.stats.pair_tests,
        intersecting = evaluation.stats.intersecting,
        "region written"
    );
    Ok(Some(evaluation))
}

/// A named CSG tree to resolve into one soup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub path: String,
    pub tree: CsgTree,
}

impl Region {
    pub fn new(path: impl Into<String>, tree: CsgTree) -> Self {
        Self {
            path: path.into(),
            tree,
        }
    }
}

/// What happened to one region during a walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegionStatus {
    Written { faces: usize },
    /// The tree was a `Nop`
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub path: String,
    #[serde(flatten)]
    pub status: RegionStatus,
    pub stats: SplitStats,
}

/// Results of walking a list of regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkSummary {
    pub regions: Vec<RegionReport>,
    /// Split statistics summed over all regions
    pub stats: SplitStats,
}

impl WalkSummary {
    fn count(&self, pred: impl Fn(&RegionStatus) -> bool) -> usize {
        self.regions.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, RegionStatus::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RegionStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RegionStatus::Failed { .. }))
    }
}

/// Batch driver: evaluates regions one after another
pub struct Bottess {
    config: EngineConfig,
    tessellator: Box<dyn LeafTessellator>,
}

impl Bottess {
    /// Driver using the built-in primitive tessellator
    pub fn new(config: EngineConfig) -> Self {
        let tessellator = Box::new(PrimitiveTessellator::from_config(&config));
        Self {
            config,
            tessellator,
        }
    }

    pub fn with_tessellator(config: EngineConfig, tessellator: Box<dyn LeafTessellator>) -> Self {
        Self {
            config,
            tessellator,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn region_end(
        &self,
        region: &Region,
        sink: &mut dyn RegionWriter,
    ) -> Result<Option<Evaluation>> {
        region_end(
            &region.path,
            &region.tree,
            self.tessellator.as_ref(),
            &self.config,
            sink,
        )
    }

    /// Evaluate every region; failures are logged and do not stop the walk
    pub fn walk(&self, regions: &[Region], sink: &mut dyn RegionWriter) -> WalkSummary {
        self.walk_with(regions, sink, |_| {})
    }

    /// Like [`Bottess::walk`], calling `on_region` after each region
    pub fn walk_with(
        &self,
        regions: &[Region],
        sink: &mut dyn RegionWriter,
        mut on_region: impl FnMut(&RegionReport),
    ) -> WalkSummary {
        let mut summary = WalkSummary::default();

        for region in regions {
            let (status, stats) = match self.region_end(region, sink) {
                Ok(Some(evaluation)) => (
                    RegionStatus::Written {
                        faces: evaluation.soup.len(),
                    },
                    evaluation.stats,
                ),
                Ok(None) => (RegionStatus::Skipped, SplitStats::default()),
                Err(err) => {
                    error!(path = %region.path, %err, "region failed");
                    (
                        RegionStatus::Failed {
                            error: err.to_string(),
                        },
                        SplitStats::default(),
                    )
                }
            };

            summary.stats.merge(&stats);
            let report = RegionReport {
                path: region.path.clone(),
                status,
                stats,
            };
            on_region(&report);
            summary.regions.push(report);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Point3;

    fn tetra() -> CsgTree {
        CsgTree::leaf(
            "tet",
            Primitive::tetrahedron([
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ]),
        )
    }

    #[test]
    fn test_facet_listing() {
        let config = EngineConfig::default();
        let tess = PrimitiveTessellator::from_config(&config);
        let mut writer = TextFacetWriter::new(Vec::new());

        let evaluation = region_end("/r1", &tetra(), &tess, &config, &mut writer)
            .unwrap()
            .unwrap();
        assert_eq!(evaluation.soup.len(), 4);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"solid /r1"));
        assert_eq!(lines.last(), Some(&"endsolid /r1"));
        assert_eq!(lines.len(), 2 + 4 * 7);
        assert_eq!(lines.iter().filter(|l| l.starts_with("  facet normal ")).count(), 4);
        assert!(lines.contains(&"      vertex 0.000000 0.000000 0.000000"));
        assert_eq!(lines[2], "    outer loop");
    }

    #[test]
    fn test_nop_region_writes_nothing() {
        let config = EngineConfig::default();
        let tess = PrimitiveTessellator::from_config(&config);
        let mut writer = TextFacetWriter::new(Vec::new());

        let result = region_end("/empty", &CsgTree::Nop, &tess, &config, &mut writer).unwrap();
        assert!(result.is_none());
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_walk_skips_failures() {
        let driver = Bottess::new(EngineConfig::default());
        let regions = vec![
            Region::new("/ok", tetra()),
            Region::new("/bad", CsgTree::leaf("bad", Primitive::sphere(Point3::origin(), -1.0, 8))),
            Region::new("/nop", CsgTree::Nop),
            Region::new("/also_ok", tetra()),
        ];
        let mut sink = CollectingWriter::new();
        let mut seen = Vec::new();

        let summary = driver.walk_with(&regions, &mut sink, |r| seen.push(r.path.clone()));

        assert_eq!(summary.written(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(sink.regions.len(), 2);
        assert_eq!(sink.regions[1].0, "/also_ok");
        assert_eq!(seen, vec!["/ok", "/bad", "/nop", "/also_ok"]);
        assert!(matches!(
            &summary.regions[1].status,
            RegionStatus::Failed { error } if error.contains("bad")
        ));
    }
}
