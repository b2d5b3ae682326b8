//! Progress Tracking
//!
//! Stateless progress and pacing engine for projects, OKRs and KPIs, plus a
//! storage-backed tracker that writes derived progress back.

#![warn(missing_docs)]

pub mod metric;
pub mod status;
pub mod aggregator;
pub mod key_result;
pub mod pacing;
pub mod stats;
pub mod tracker;

pub use aggregator::{ProjectProgress, TaskProgressAggregator, TaskStats};
pub use key_result::{KeyResultProgress, KeyResultTracker};
pub use pacing::{KpiProgress, ObjectivePacingEngine, ObjectiveProgress, Pacing};
pub use stats::{KpiStats, ObjectiveStats, ProjectStats, Statistics};
pub use status::{CompletionStatus, StatusDeriver};
pub use tracker::{
    BasicProgressTracker, KpiReport, ObjectiveReport, ProgressSnapshot, ProgressTracker,
    ProjectReport, TrackerError,
};

use pacer_core::{Date, KeyResult, Kpi, Task};

fn local_today() -> Date {
    chrono::Utc::now().date_naive()
}

/// Progress of a project with the given tasks.
pub fn compute_project_progress(tasks: &[Task]) -> ProjectProgress {
    TaskProgressAggregator::aggregate(tasks)
}

/// Progress of a single key result.
pub fn compute_key_result_progress(kr: &KeyResult) -> KeyResultProgress {
    KeyResultTracker::evaluate(kr)
}

/// Objective progress paced against today's date.
pub fn compute_objective_progress(
    key_results: &[KeyResult],
    start: Date,
    end: Option<Date>,
) -> ObjectiveProgress {
    compute_objective_progress_at(key_results, start, end, local_today())
}

/// Objective progress paced against `today`.
pub fn compute_objective_progress_at(
    key_results: &[KeyResult],
    start: Date,
    end: Option<Date>,
    today: Date,
) -> ObjectiveProgress {
    ObjectivePacingEngine::objective(key_results, start, end, today)
}

/// KPI progress paced against today's date.
pub fn compute_kpi_progress(kpi: &Kpi) -> KpiProgress {
    compute_kpi_progress_at(kpi, local_today())
}

/// KPI progress paced against `today`.
pub fn compute_kpi_progress_at(kpi: &Kpi, today: Date) -> KpiProgress {
    ObjectivePacingEngine::kpi(kpi, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pacer_core::{ProjectId, ProjectStatus, TaskStatus};

    #[test]
    fn test_project_progress_from_tasks() {
        let project = ProjectId::new();
        let tasks: Vec<Task> = [TaskStatus::Completed, TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Todo]
            .into_iter()
            .map(|s| Task::new(project, "t").with_status(s))
            .collect();
        let progress = compute_project_progress(&tasks);
        assert_eq!(progress.percent_complete, 25);
        assert_eq!(progress.derived_status, ProjectStatus::InProgress);

        let empty = compute_project_progress(&[]);
        assert_eq!(empty.percent_complete, 0);
        assert_eq!(empty.derived_status, ProjectStatus::Planning);
    }

    #[test]
    fn test_key_result_progress() {
        let kr = KeyResult::new("Signups", 0.0, 100.0).with_current(80.0);
        let progress = compute_key_result_progress(&kr);
        assert_eq!(progress.progress, 80.0);
        assert!(progress.is_on_track);
        assert_eq!(progress.completion_status, CompletionStatus::OnTrack);

        let flat = KeyResult::new("Flat", 5.0, 5.0).with_current(9.0);
        assert_eq!(compute_key_result_progress(&flat).progress, 0.0);
    }

    #[test]
    fn test_objective_progress_uses_current_date() {
        let today = local_today();
        let krs = [KeyResult::new("kr", 0.0, 10.0).with_current(10.0)];
        let progress = compute_objective_progress(&krs, today - Duration::days(5), None);
        assert_eq!(progress.overall_progress, 100.0);
        assert!(progress.is_on_track);
        assert!(progress.pacing.days_elapsed >= 5);
    }

    #[test]
    fn test_kpi_progress_at_explicit_date() {
        let today = local_today();
        let kpi = Kpi::new("Leads", 0.0, 100.0, today).with_current(25.0);
        let progress = compute_kpi_progress_at(&kpi, today + Duration::days(15));
        assert_eq!(progress.progress, 25.0);
        assert_eq!(progress.pacing.expected_progress, 50.0);
        assert!(!progress.is_on_track);
        assert_eq!(progress.completion_status, CompletionStatus::Behind);
    }
}
