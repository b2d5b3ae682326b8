//! Progress tracking service.
//!
//! Glue between stored records and the stateless engine: loads records,
//! computes progress, and writes derived values back.

use async_trait::async_trait;
use chrono::Utc;
use pacer_core::{
    Date, KeyResultId, KeyResultStatus, Kpi, KpiId, Objective, ObjectiveId, Project, ProjectId,
    TaskFilter, TaskId, TaskStatus, Time, ValidationError,
};
use pacer_storage::{Storage, StorageError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{ProjectProgress, TaskProgressAggregator, TaskStats};
use crate::key_result::{KeyResultProgress, KeyResultTracker};
use crate::pacing::{KpiProgress, ObjectivePacingEngine, ObjectiveProgress};
use crate::stats::{KpiStats, ObjectiveStats, ProjectStats, Statistics};

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors raised by the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Underlying storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind
        kind: &'static str,
        /// Requested ID
        id: String,
    },

    /// Input rejected before anything was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TrackerError {
    fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// A project with its task-derived progress.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    /// The project as stored
    pub project: Project,
    /// Progress derived from its tasks
    pub progress: ProjectProgress,
    /// Task counts
    pub tasks: TaskStats,
}

/// An objective with pacing and per-key-result progress.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveReport {
    /// The objective as stored
    pub objective: Objective,
    /// Overall progress and pacing
    pub progress: ObjectiveProgress,
    /// Progress of each key result, cancelled ones included
    pub key_results: Vec<(KeyResultId, KeyResultProgress)>,
}

/// A KPI with its pacing.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// The KPI as stored
    pub kpi: Kpi,
    /// Progress and pacing
    pub progress: KpiProgress,
}

/// Progress of everything at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: Time,

    /// Day the pacing was evaluated for
    pub today: Date,

    /// Project progress by project ID
    pub project_progress: Vec<(ProjectId, ProjectProgress)>,

    /// Objective progress by objective ID
    pub objective_progress: Vec<(ObjectiveId, ObjectiveProgress)>,

    /// KPI progress by KPI ID
    pub kpi_progress: Vec<(KpiId, KpiProgress)>,
}

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Recompute a project's progress from its tasks and persist it.
    async fn refresh_project(&mut self, id: ProjectId) -> Result<ProjectProgress>;

    /// Delete a task and refresh the project it belonged to.
    async fn delete_task(&mut self, id: TaskId) -> Result<ProjectProgress>;

    /// Project progress without writing anything.
    async fn project_report(&self, id: ProjectId) -> Result<ProjectReport>;

    /// Objective progress as of `today`.
    async fn objective_report(&self, id: ObjectiveId, today: Date) -> Result<ObjectiveReport>;

    /// Set a key result's current value and persist the objective.
    async fn update_key_result(
        &mut self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
        value: f64,
    ) -> Result<KeyResultProgress>;

    /// KPI progress as of `today`.
    async fn kpi_report(&self, id: KpiId, today: Date) -> Result<KpiReport>;

    /// Set a KPI's current value and persist it.
    async fn update_kpi(&mut self, id: KpiId, value: f64, today: Date) -> Result<KpiProgress>;

    /// Take a progress snapshot.
    async fn snapshot(&self, today: Date) -> Result<ProgressSnapshot>;

    /// Portfolio statistics as of `today`.
    async fn statistics(&self, today: Date) -> Result<Statistics>;
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<S: Storage> {
    storage: S,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the underlying storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    async fn require_project(&self, id: ProjectId) -> Result<Project> {
        self.storage
            .load_project(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("project", id))
    }

    async fn require_objective(&self, id: ObjectiveId) -> Result<Objective> {
        self.storage
            .load_objective(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("objective", id))
    }

    async fn require_kpi(&self, id: KpiId) -> Result<Kpi> {
        self.storage
            .load_kpi(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("kpi", id))
    }

    async fn project_progress(&self, id: ProjectId) -> Result<(ProjectProgress, TaskStats)> {
        let tasks = self.storage.list_tasks(&TaskFilter::for_project(id)).await?;
        let progress = TaskProgressAggregator::aggregate(&tasks);
        debug!(
            "Project {}: {}/{} tasks completed -> {}%",
            id,
            tasks.iter().filter(|t| t.status == TaskStatus::Completed).count(),
            tasks.len(),
            progress.percent_complete
        );
        Ok((progress, TaskProgressAggregator::stats(&tasks)))
    }

    fn evaluate_objective(objective: &Objective, today: Date) -> ObjectiveProgress {
        let progress = ObjectivePacingEngine::objective(
            &objective.counted_key_results(),
            objective.start_date,
            objective.end_date,
            today,
        );
        debug!(
            "Objective {}: {:.1}% (expected {:.1}%)",
            objective.id, progress.overall_progress, progress.pacing.expected_progress
        );
        progress
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn refresh_project(&mut self, id: ProjectId) -> Result<ProjectProgress> {
        let mut project = self.require_project(id).await?;
        let (progress, _) = self.project_progress(id).await?;

        if project.progress == progress.percent_complete && project.status == progress.derived_status {
            return Ok(progress);
        }

        info!(
            "Project {} progress {}% -> {}%, status {} -> {}",
            id, project.progress, progress.percent_complete, project.status, progress.derived_status
        );
        project.progress = progress.percent_complete;
        project.status = progress.derived_status;
        project.updated_at = Utc::now();
        self.storage.save_project(&project).await?;
        self.storage
            .commit(&format!("Refresh progress of project {}", id))
            .await?;
        Ok(progress)
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<ProjectProgress> {
        let task = self
            .storage
            .load_task(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("task", id))?;
        self.storage.delete_task(id).await?;
        self.storage.commit(&format!("Delete task {}", id)).await?;
        info!("Deleted task {} from project {}", id, task.project_id);
        self.refresh_project(task.project_id).await
    }

    async fn project_report(&self, id: ProjectId) -> Result<ProjectReport> {
        let project = self.require_project(id).await?;
        let (progress, tasks) = self.project_progress(id).await?;
        Ok(ProjectReport {
            project,
            progress,
            tasks,
        })
    }

    async fn objective_report(&self, id: ObjectiveId, today: Date) -> Result<ObjectiveReport> {
        let objective = self.require_objective(id).await?;
        let progress = Self::evaluate_objective(&objective, today);
        let key_results = objective
            .key_results
            .iter()
            .map(|kr| (kr.id, KeyResultTracker::evaluate(kr)))
            .collect();
        Ok(ObjectiveReport {
            objective,
            progress,
            key_results,
        })
    }

    async fn update_key_result(
        &mut self,
        objective_id: ObjectiveId,
        key_result_id: KeyResultId,
        value: f64,
    ) -> Result<KeyResultProgress> {
        if !value.is_finite() {
            warn!("Rejected non-finite value for key result {}", key_result_id);
            return Err(ValidationError::NonFinite {
                field: "current".to_string(),
                value,
            }
            .into());
        }

        let mut objective = self.require_objective(objective_id).await?;
        let kr = objective
            .key_result_mut(key_result_id)
            .ok_or_else(|| TrackerError::not_found("key result", key_result_id))?;

        let progress = KeyResultTracker::update_current_value(kr, value);
        if progress.is_completed && kr.status == KeyResultStatus::Active {
            info!("Key result {} reached its target", key_result_id);
            kr.status = KeyResultStatus::Completed;
        }
        debug!("Key result {} -> {:.1}%", key_result_id, progress.progress);

        objective.updated_at = Utc::now();
        self.storage.save_objective(&objective).await?;
        self.storage
            .commit(&format!("Update key result {}", key_result_id))
            .await?;
        Ok(progress)
    }

    async fn kpi_report(&self, id: KpiId, today: Date) -> Result<KpiReport> {
        let kpi = self.require_kpi(id).await?;
        let progress = ObjectivePacingEngine::kpi(&kpi, today);
        debug!(
            "KPI {}: {:.1}% (expected {:.1}%)",
            id, progress.progress, progress.pacing.expected_progress
        );
        Ok(KpiReport { kpi, progress })
    }

    async fn update_kpi(&mut self, id: KpiId, value: f64, today: Date) -> Result<KpiProgress> {
        if !value.is_finite() {
            warn!("Rejected non-finite value for KPI {}", id);
            return Err(ValidationError::NonFinite {
                field: "current".to_string(),
                value,
            }
            .into());
        }

        let mut kpi = self.require_kpi(id).await?;
        kpi.current = value;
        kpi.updated_at = Utc::now();
        self.storage.save_kpi(&kpi).await?;
        self.storage.commit(&format!("Update KPI {}", id)).await?;

        let progress = ObjectivePacingEngine::kpi(&kpi, today);
        info!("KPI {} current value {} ({:.1}%)", id, value, progress.progress);
        Ok(progress)
    }

    async fn snapshot(&self, today: Date) -> Result<ProgressSnapshot> {
        let mut project_progress = Vec::new();
        for project in self.storage.list_projects().await? {
            let (progress, _) = self.project_progress(project.id).await?;
            project_progress.push((project.id, progress));
        }

        let objective_progress = self
            .storage
            .list_objectives()
            .await?
            .iter()
            .map(|o| (o.id, Self::evaluate_objective(o, today)))
            .collect();

        let kpi_progress = self
            .storage
            .list_kpis()
            .await?
            .iter()
            .map(|k| (k.id, ObjectivePacingEngine::kpi(k, today)))
            .collect();

        Ok(ProgressSnapshot {
            timestamp: Utc::now(),
            today,
            project_progress,
            objective_progress,
            kpi_progress,
        })
    }

    async fn statistics(&self, today: Date) -> Result<Statistics> {
        let projects = self.storage.list_projects().await?;
        let objectives = self.storage.list_objectives().await?;
        let kpis = self.storage.list_kpis().await?;
        Ok(Statistics {
            projects: ProjectStats::collect(&projects, today),
            objectives: ObjectiveStats::collect(&objectives, today),
            kpis: KpiStats::collect(&kpis, today),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use pacer_core::{KeyResult, ProjectStatus, Task};
    use pacer_storage::JsonStorage;
    use tempfile::TempDir;

    fn today() -> Date {
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    }

    async fn tracker() -> (BasicProgressTracker<JsonStorage>, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        (BasicProgressTracker::new(storage), dir)
    }

    #[tokio::test]
    async fn test_refresh_project_writes_back() {
        let (mut tracker, _dir) = tracker().await;
        let project = Project::new("Website");
        tracker.storage_mut().save_project(&project).await.unwrap();
        for status in [TaskStatus::Completed, TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Todo] {
            let task = Task::new(project.id, "t").with_status(status);
            tracker.storage_mut().save_task(&task).await.unwrap();
        }

        let progress = tracker.refresh_project(project.id).await.unwrap();
        assert_eq!(progress.percent_complete, 25);

        let stored = tracker.storage().load_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.progress, 25);
        assert_eq!(stored.status, ProjectStatus::InProgress);
    }

    #[tokio::test]
    async fn test_refresh_overrides_on_hold() {
        let (mut tracker, _dir) = tracker().await;
        let mut project = Project::new("Paused");
        project.status = ProjectStatus::OnHold;
        tracker.storage_mut().save_project(&project).await.unwrap();
        let task = Task::new(project.id, "t").with_status(TaskStatus::Completed);
        tracker.storage_mut().save_task(&task).await.unwrap();

        tracker.refresh_project(project.id).await.unwrap();
        let stored = tracker.storage().load_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Completed);
        assert_eq!(stored.progress, 100);
    }

    #[tokio::test]
    async fn test_delete_task_refreshes_project() {
        let (mut tracker, _dir) = tracker().await;
        let project = Project::new("Launch");
        tracker.storage_mut().save_project(&project).await.unwrap();
        let done = Task::new(project.id, "done").with_status(TaskStatus::Completed);
        let open = Task::new(project.id, "open");
        tracker.storage_mut().save_task(&done).await.unwrap();
        tracker.storage_mut().save_task(&open).await.unwrap();
        tracker.refresh_project(project.id).await.unwrap();

        let progress = tracker.delete_task(open.id).await.unwrap();
        assert_eq!(progress.percent_complete, 100);
        assert!(tracker.storage().load_task(open.id).await.unwrap().is_none());

        let stored = tracker.storage().load_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.progress, 100);
        assert_eq!(stored.status, ProjectStatus::Completed);

        let err = tracker.delete_task(open.id).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { kind: "task", .. }));
    }

    #[tokio::test]
    async fn test_missing_project_is_not_found() {
        let (mut tracker, _dir) = tracker().await;
        let err = tracker.refresh_project(ProjectId::new()).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { kind: "project", .. }));
    }

    #[tokio::test]
    async fn test_update_key_result_marks_completed() {
        let (mut tracker, _dir) = tracker().await;
        let mut objective = Objective::new("Grow", today() - Duration::days(10));
        let kr = KeyResult::new("Revenue", 0.0, 1000.0);
        let kr_id = kr.id;
        objective.key_results.push(kr);
        tracker.storage_mut().save_objective(&objective).await.unwrap();

        let progress = tracker
            .update_key_result(objective.id, kr_id, 1200.0)
            .await
            .unwrap();
        assert!(progress.is_completed);

        let stored = tracker.storage().load_objective(objective.id).await.unwrap().unwrap();
        assert_eq!(stored.key_results[0].current, 1200.0);
        assert_eq!(stored.key_results[0].status, KeyResultStatus::Completed);
    }

    #[tokio::test]
    async fn test_update_key_result_rejects_nan() {
        let (mut tracker, _dir) = tracker().await;
        let err = tracker
            .update_key_result(ObjectiveId::new(), KeyResultId::new(), f64::NAN)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_objective_report_skips_cancelled() {
        let (mut tracker, _dir) = tracker().await;
        let mut objective = Objective::new("Ship", today() - Duration::days(45));
        objective
            .key_results
            .push(KeyResult::new("done", 0.0, 10.0).with_current(10.0));
        let mut cancelled = KeyResult::new("dropped", 0.0, 10.0);
        cancelled.status = KeyResultStatus::Cancelled;
        objective.key_results.push(cancelled);
        tracker.storage_mut().save_objective(&objective).await.unwrap();

        let report = tracker.objective_report(objective.id, today()).await.unwrap();
        assert_eq!(report.progress.overall_progress, 100.0);
        assert!(report.progress.is_on_track);
        assert_eq!(report.key_results.len(), 2);
    }

    #[tokio::test]
    async fn test_update_kpi_and_snapshot() {
        let (mut tracker, _dir) = tracker().await;
        let kpi = Kpi::new("Uptime", 0.0, 10.0, today() - Duration::days(15));
        tracker.storage_mut().save_kpi(&kpi).await.unwrap();

        let progress = tracker.update_kpi(kpi.id, 5.0, today()).await.unwrap();
        assert_eq!(progress.progress, 50.0);
        assert!(progress.is_on_track);

        let report = tracker.kpi_report(kpi.id, today()).await.unwrap();
        assert_eq!(report.kpi.current, 5.0);

        let project = Project::new("Empty");
        tracker.storage_mut().save_project(&project).await.unwrap();

        let snapshot = tracker.snapshot(today()).await.unwrap();
        assert_eq!(snapshot.today, today());
        assert_eq!(snapshot.kpi_progress.len(), 1);
        assert_eq!(snapshot.project_progress.len(), 1);
        assert_eq!(snapshot.project_progress[0].1.derived_status, ProjectStatus::Planning);
        assert!(snapshot.objective_progress.is_empty());

        let stats = tracker.statistics(today()).await.unwrap();
        assert_eq!(stats.kpis.on_track, 1);
        assert_eq!(stats.projects.total, 1);
    }
}
