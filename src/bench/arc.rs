use tracing::debug;

use crate::perception::grid::Grid;
use crate::perception::task::ArcTask;
use crate::synthesis::object_ops::{learn_solver, Outcome, Solver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Train matched and every test output reproduced.
    Solved { method: String },
    /// Train matched, a test output was wrong or not produced.
    Failed { method: String },
    /// Train matched, no expected test outputs to check against.
    Unverified { method: String },
    /// No solver reproduced the train pairs.
    Unsolved,
}

impl TaskStatus {
    pub fn method(&self) -> Option<&str> {
        match self {
            TaskStatus::Solved { method }
            | TaskStatus::Failed { method }
            | TaskStatus::Unverified { method } => Some(method),
            TaskStatus::Unsolved => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Solved { .. } => "OK",
            TaskStatus::Failed { .. } => "XX",
            TaskStatus::Unverified { .. } => "??",
            TaskStatus::Unsolved => "--",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    /// Solvers tried before one matched (or all of them).
    pub checked: usize,
}

impl TaskResult {
    pub fn solved(&self) -> bool {
        matches!(self.status, TaskStatus::Solved { .. })
    }
}

/// Learn a solver from the train pairs and apply it to every test input.
/// `None` when no solver matches train.
pub fn predict<S: Solver>(task: &ArcTask, solvers: &[S]) -> Option<(String, Vec<Outcome>)> {
    let pairs = task.train_pairs();
    let solver = learn_solver(&pairs, solvers)?;
    let outcomes = task.test.iter().map(|ex| solver.solve(&ex.input)).collect();
    Some((solver.name(), outcomes))
}

pub fn solve_task<S: Solver>(task: &ArcTask, solvers: &[S]) -> TaskResult {
    let pairs = task.train_pairs();
    let matched = learn_solver(&pairs, solvers);
    let checked = match matched {
        Some(s) => solvers.iter().position(|x| std::ptr::eq(x, s)).map_or(solvers.len(), |i| i + 1),
        None => solvers.len(),
    };

    let status = match matched {
        None => TaskStatus::Unsolved,
        Some(solver) => {
            let method = solver.name();
            if !task.has_test_outputs() {
                TaskStatus::Unverified { method }
            } else {
                let test_ok = task.test.iter().all(|ex| {
                    let expected: Option<&Grid> = ex.output.as_ref();
                    solver.solve(&ex.input).grid() == expected
                });
                if test_ok { TaskStatus::Solved { method } } else { TaskStatus::Failed { method } }
            }
        }
    };

    debug!(task = %task.id, status = status.label(), checked, "evaluated task");
    TaskResult { task_id: task.id.clone(), status, checked }
}
