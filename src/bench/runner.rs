// ARC benchmark runner.
// Loads tasks from a directory of task files or a single challenges file,
// attaches expected solutions, runs the object solvers and aggregates a
// per-task report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use tracing::{info, warn};

use super::arc::{solve_task, TaskResult, TaskStatus};
use crate::core::config::RunConfig;
use crate::perception::task::{load_challenges, load_solutions, load_task, ArcTask};
use crate::synthesis::object_ops::ObjectSolver;

#[derive(Debug)]
pub struct BenchmarkReport {
    pub total_tasks: usize,
    pub solved: usize,
    pub failed: usize,
    pub unverified: usize,
    pub score: f64,
    pub elapsed_ms: u64,
    pub by_method: Vec<(String, usize)>,
    pub per_task: Vec<TaskReport>,
}

#[derive(Debug, Clone)]
pub struct TaskReport {
    pub result: TaskResult,
    pub elapsed_ms: u64,
}

/// `.json` paths sorted by file name. Entries that failed to read are logged and skipped.
fn json_paths<I>(entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut paths: Vec<PathBuf> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths
}

/// Task files in `dir`, sorted by file name. Unreadable files are skipped.
pub fn load_task_dir(dir: &Path) -> anyhow::Result<Vec<ArcTask>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading task directory {}", dir.display()))?
        .map(|e| e.map(|entry| entry.path()));
    let paths = json_paths(entries);

    let mut tasks = Vec::with_capacity(paths.len());
    for path in paths {
        match load_task(&path) {
            Ok(task) => tasks.push(task),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping task"),
        }
    }
    Ok(tasks)
}

fn load_tasks(config: &RunConfig) -> anyhow::Result<Vec<ArcTask>> {
    let mut tasks = match (&config.data_dir, &config.challenges) {
        (Some(dir), _) => load_task_dir(dir)?,
        (None, Some(file)) => load_challenges(file)?,
        (None, None) => bail!("no task source: set data_dir or challenges"),
    };

    if let Some(path) = &config.solutions {
        let solutions = load_solutions(path)?;
        for task in &mut tasks {
            match solutions.get(&task.id) {
                Some(grids) => {
                    if let Err(e) = task.attach_solutions(grids) {
                        warn!(task = %task.id, error = %e, "solutions do not cover every test input");
                    }
                }
                None => warn!(task = %task.id, "no solution entry"),
            }
        }
    }

    if let Some(max) = config.max_tasks {
        tasks.truncate(max);
    }
    Ok(tasks)
}

/// Run every object solver over the configured tasks.
pub fn run_benchmark(config: &RunConfig) -> anyhow::Result<BenchmarkReport> {
    let tasks = load_tasks(config)?;
    info!(tasks = tasks.len(), "loaded tasks");
    Ok(evaluate_tasks(&tasks, config))
}

pub fn evaluate_tasks(tasks: &[ArcTask], config: &RunConfig) -> BenchmarkReport {
    let total_start = Instant::now();
    let mut per_task = Vec::with_capacity(tasks.len());
    let mut method_counts: rustc_hash::FxHashMap<String, usize> = Default::default();

    for task in tasks {
        let start = Instant::now();
        let solvers = ObjectSolver::candidates(&task.train_pairs(), &config.detect);
        let result = solve_task(task, &solvers);
        let elapsed = start.elapsed().as_millis() as u64;

        if let TaskStatus::Solved { method } = &result.status {
            *method_counts.entry(method.clone()).or_default() += 1;
        }
        per_task.push(TaskReport { result, elapsed_ms: elapsed });
    }

    let total_elapsed = total_start.elapsed().as_millis() as u64;
    let count = |f: fn(&TaskStatus) -> bool| per_task.iter().filter(|t| f(&t.result.status)).count();
    let solved = count(|s| matches!(s, TaskStatus::Solved { .. }));
    let failed = count(|s| matches!(s, TaskStatus::Failed { .. }));
    let unverified = count(|s| matches!(s, TaskStatus::Unverified { .. }));

    let mut by_method: Vec<(String, usize)> = method_counts.into_iter().collect();
    by_method.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    info!(total = per_task.len(), solved, failed, elapsed_ms = total_elapsed, "benchmark finished");

    BenchmarkReport {
        total_tasks: per_task.len(),
        solved,
        failed,
        unverified,
        score: if per_task.is_empty() { 0.0 } else { solved as f64 / per_task.len() as f64 },
        elapsed_ms: total_elapsed,
        by_method,
        per_task,
    }
}

impl BenchmarkReport {
    pub fn print_summary(&self) {
        println!("=== ARC Object Solver Results ===");
        println!("Tasks: {} | Solved: {} | Failed: {} | Unverified: {} | Score: {:.1}%",
            self.total_tasks, self.solved, self.failed, self.unverified, self.score * 100.0);
        println!("Time: {}ms", self.elapsed_ms);
        println!("\nBy method:");
        for (method, count) in &self.by_method {
            println!("  {}: {} ({:.1}%)", method, count,
                *count as f64 / self.solved.max(1) as f64 * 100.0);
        }
    }

    pub fn print_detail(&self) {
        self.print_summary();
        println!("\nPer-task detail:");
        for t in &self.per_task {
            let r = &t.result;
            println!("  [{}] {} | method={} checked={} time={}ms",
                r.status.label(), r.task_id, r.status.method().unwrap_or("none"), r.checked, t.elapsed_ms);
        }
    }
}
