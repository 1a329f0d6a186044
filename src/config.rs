// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine configuration system

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bottess::DEFAULT_BBOX_FLUFF;
use crate::geometry::Tolerance;

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "bottess.toml";

/// Boolean engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Padding added to face bounding boxes
    pub bbox_fluff: f64,
    /// Maximum face pairs tested per evaluation (None = unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_budget: Option<u64>,
    /// Evaluate sibling subtrees on the rayon pool
    pub parallel: bool,
    /// Fail on split shapes the splitter cannot cut
    pub strict_splits: bool,
    /// Run the solidity check on every tessellated leaf
    pub check_leaves: bool,
    /// Segment count for curved primitives that do not give one
    pub sphere_segments: u32,
    /// Distance and angular tolerances
    pub tolerance: Tolerance,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bbox_fluff: DEFAULT_BBOX_FLUFF,
            pair_budget: Some(10_000_000),
            parallel: true,
            strict_splits: false,
            check_leaves: false,
            sphere_segments: 24,
            tolerance: Tolerance::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `bottess.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Like [`EngineConfig::load`], reading `path` instead of the default file
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if PathBuf::from(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `BOTTESS_*` overrides fetched through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dist) = lookup("BOTTESS_TOL_DIST").and_then(|v| v.parse().ok()) {
            self.tolerance.dist = dist;
        }

        if let Some(budget) = lookup("BOTTESS_PAIR_BUDGET") {
            self.pair_budget = match budget.trim() {
                "" | "none" | "unlimited" => None,
                value => value.parse().ok().or(self.pair_budget),
            };
        }

        if let Some(parallel) = lookup("BOTTESS_PARALLEL") {
            self.parallel = parallel.parse().unwrap_or(self.parallel);
        }

        if let Some(strict) = lookup("BOTTESS_STRICT") {
            self.strict_splits = strict.parse().unwrap_or(false);
        }
    }

    /// Reject settings no evaluation can run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tolerance.dist > 0.0,
            "tolerance.dist must be positive, got {}",
            self.tolerance.dist
        );
        ensure!(
            self.tolerance.perp > 0.0 && self.tolerance.perp < 1.0,
            "tolerance.perp must be in (0, 1), got {}",
            self.tolerance.perp
        );
        ensure!(
            self.bbox_fluff >= 0.0,
            "bbox_fluff must not be negative, got {}",
            self.bbox_fluff
        );
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
