//! # Configuration
//!
//! Detector settings and benchmark settings are plain values passed to the
//! functions that need them. Nothing here reads the process environment.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::perception::color::{Color, ColorSet};

/// How the object detector groups cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Colors treated as background. Never part of an object, never a bridge.
    pub ignore_colors: ColorSet,

    /// 8-connected when true, 4-connected when false.
    pub go_diagonal: bool,

    /// Only merge neighbours that share a color.
    pub monochromatic: bool,
}

impl DetectConfig {
    /// Background black, diagonal adjacency, mixed-color objects.
    pub fn new() -> Self {
        Self {
            ignore_colors: ColorSet::single(Color::Black),
            go_diagonal: true,
            monochromatic: false,
        }
    }

    pub fn with_ignore<I: IntoIterator<Item = Color>>(mut self, colors: I) -> Self {
        self.ignore_colors = colors.into_iter().collect();
        self
    }

    pub fn with_diagonal(mut self, go_diagonal: bool) -> Self {
        self.go_diagonal = go_diagonal;
        self
    }

    pub fn with_monochromatic(mut self, monochromatic: bool) -> Self {
        self.monochromatic = monochromatic;
        self
    }

    pub fn is_background(&self, color: Color) -> bool {
        self.ignore_colors.contains(color)
    }

    /// Apply whichever settings `overrides` carries.
    pub fn merged(mut self, overrides: &DetectOverrides) -> Self {
        if let Some(diagonal) = overrides.go_diagonal {
            self.go_diagonal = diagonal;
        }
        if let Some(mono) = overrides.monochromatic {
            self.monochromatic = mono;
        }
        if let Some(colors) = &overrides.ignore_colors {
            self.ignore_colors = colors.iter().copied().collect();
        }
        self
    }
}

/// Detector settings given explicitly on top of a base configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectOverrides {
    pub go_diagonal: Option<bool>,
    pub monochromatic: Option<bool>,
    pub ignore_colors: Option<Vec<Color>>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Benchmark harness configuration
///
/// Exactly one of `data_dir` / `challenges` is expected; `data_dir` wins if
/// both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory of per-task `<id>.json` files
    pub data_dir: Option<PathBuf>,

    /// Single challenges file keyed by task id
    pub challenges: Option<PathBuf>,

    /// Expected test outputs keyed by task id
    pub solutions: Option<PathBuf>,

    pub max_tasks: Option<usize>,

    pub detect: DetectConfig,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Settings from `overrides` replace the ones loaded from file.
    pub fn merged(mut self, overrides: RunOverrides) -> Self {
        if overrides.data_dir.is_some() { self.data_dir = overrides.data_dir; }
        if overrides.challenges.is_some() { self.challenges = overrides.challenges; }
        if overrides.solutions.is_some() { self.solutions = overrides.solutions; }
        if overrides.max_tasks.is_some() { self.max_tasks = overrides.max_tasks; }
        self.detect = self.detect.merged(&overrides.detect);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub data_dir: Option<PathBuf>,
    pub challenges: Option<PathBuf>,
    pub solutions: Option<PathBuf>,
    pub max_tasks: Option<usize>,
    pub detect: DetectOverrides,
}
