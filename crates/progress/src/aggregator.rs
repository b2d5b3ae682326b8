//! Project progress derived from the status of its tasks.

use pacer_core::{ProjectStatus, Task, TaskStatus};
use serde::{Deserialize, Serialize};

use crate::metric::ratio_percent;
use crate::status::StatusDeriver;

/// Completion percentage and the status it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProgress {
    /// Completed tasks as a whole percentage (0-100)
    pub percent_complete: u8,

    /// Status implied by `percent_complete`
    pub derived_status: ProjectStatus,
}

impl Default for ProjectProgress {
    fn default() -> Self {
        Self {
            percent_complete: 0,
            derived_status: ProjectStatus::Planning,
        }
    }
}

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// All tasks
    pub total: usize,
    /// Completed tasks
    pub completed: usize,
    /// Tasks in progress
    pub in_progress: usize,
    /// Tasks not started
    pub todo: usize,
}

/// Computes [`ProjectProgress`] from a task set.
pub struct TaskProgressAggregator;

impl TaskProgressAggregator {
    /// Progress of a project with the given tasks.
    pub fn aggregate(tasks: &[Task]) -> ProjectProgress {
        Self::from_statuses(tasks.iter().map(|t| t.status))
    }

    /// Progress from bare task statuses.
    ///
    /// `percent_complete` is 100 only when every task is completed, even where
    /// rounding alone would reach it.
    pub fn from_statuses(statuses: impl IntoIterator<Item = TaskStatus>) -> ProjectProgress {
        let mut total = 0usize;
        let mut completed = 0usize;
        for status in statuses {
            total += 1;
            if status == TaskStatus::Completed {
                completed += 1;
            }
        }

        if total == 0 {
            return ProjectProgress::default();
        }

        let mut percent_complete = ratio_percent(completed, total);
        if completed < total {
            percent_complete = percent_complete.min(99);
        }

        ProjectProgress {
            percent_complete,
            derived_status: StatusDeriver::project_status(percent_complete),
        }
    }

    /// Count tasks per status.
    pub fn stats(tasks: &[Task]) -> TaskStats {
        tasks.iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Todo => stats.todo += 1,
            }
            stats
        })
    }
}
