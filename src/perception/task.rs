use std::path::Path;

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::core::error::ArcError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcExample {
    pub input: Grid,
    /// Absent for hidden test pairs until a solutions file is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Grid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcTask {
    #[serde(default)]
    pub id: String,
    pub train: Vec<ArcExample>,
    pub test: Vec<ArcExample>,
}

impl ArcTask {
    /// Train pairs that carry an output.
    pub fn train_pairs(&self) -> Vec<(&Grid, &Grid)> {
        self.train
            .iter()
            .filter_map(|ex| ex.output.as_ref().map(|out| (&ex.input, out)))
            .collect()
    }

    pub fn has_test_outputs(&self) -> bool {
        !self.test.is_empty() && self.test.iter().all(|ex| ex.output.is_some())
    }

    /// Fill test outputs from an expected-solutions list, in order.
    pub fn attach_solutions(&mut self, solutions: &[Grid]) -> crate::core::error::Result<()> {
        if solutions.len() < self.test.len() {
            return Err(ArcError::MissingSolution(self.id.clone()));
        }
        for (ex, sol) in self.test.iter_mut().zip(solutions) {
            ex.output = Some(sol.clone());
        }
        Ok(())
    }
}

/// Load one `<id>.json` task file. The id is the file stem.
pub fn load_task(path: &Path) -> anyhow::Result<ArcTask> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading task {}", path.display()))?;
    let mut task: ArcTask = serde_json::from_str(&content)
        .with_context(|| format!("parsing task {}", path.display()))?;
    task.id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    Ok(task)
}

/// Load a challenges file (`{"<id>": {train, test}, ...}`), sorted by id.
pub fn load_challenges(path: &Path) -> anyhow::Result<Vec<ArcTask>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading challenges {}", path.display()))?;
    let raw: FxHashMap<String, ArcTask> = serde_json::from_str(&content)
        .with_context(|| format!("parsing challenges {}", path.display()))?;
    let mut tasks: Vec<ArcTask> = raw
        .into_iter()
        .map(|(id, mut task)| {
            task.id = id;
            task
        })
        .collect();
    tasks.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(tasks)
}

/// Load a solutions file (`{"<id>": [grid, ...], ...}`).
pub fn load_solutions(path: &Path) -> anyhow::Result<FxHashMap<String, Vec<Grid>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading solutions {}", path.display()))?;
    let solutions = serde_json::from_str(&content)
        .with_context(|| format!("parsing solutions {}", path.display()))?;
    Ok(solutions)
}
