//! Storage trait abstraction.

use async_trait::async_trait;
use pacer_core::{
    Kpi, KpiId, Objective, ObjectiveId, Project, ProjectId, Task, TaskFilter, TaskId,
    ValidationError,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record rejected before write
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for Pacer records.
///
/// Implementations validate records on save and reject invalid ones with
/// [`StorageError::Validation`].
#[async_trait]
pub trait Storage: Send + Sync {
    // === Project operations ===

    /// Save a project (create or update).
    async fn save_project(&mut self, project: &Project) -> Result<()>;

    /// Load a project by ID.
    async fn load_project(&self, id: ProjectId) -> Result<Option<Project>>;

    /// List all projects.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Delete a project.
    async fn delete_project(&mut self, id: ProjectId) -> Result<()>;

    // === Task operations ===

    /// Save a task (create or update).
    async fn save_task(&mut self, task: &Task) -> Result<()>;

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// List tasks matching the filter.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Delete a task.
    async fn delete_task(&mut self, id: TaskId) -> Result<()>;

    // === OKR operations ===

    /// Save an objective together with its key results.
    async fn save_objective(&mut self, objective: &Objective) -> Result<()>;

    /// Load an objective by ID.
    async fn load_objective(&self, id: ObjectiveId) -> Result<Option<Objective>>;

    /// List all objectives.
    async fn list_objectives(&self) -> Result<Vec<Objective>>;

    // === KPI operations ===

    /// Save a KPI.
    async fn save_kpi(&mut self, kpi: &Kpi) -> Result<()>;

    /// Load a KPI by ID.
    async fn load_kpi(&self, id: KpiId) -> Result<Option<Kpi>>;

    /// List all KPIs.
    async fn list_kpis(&self) -> Result<Vec<Kpi>>;

    // === Transaction support ===

    /// Mark the end of a logical change. Backends that write eagerly only log it.
    async fn commit(&mut self, message: &str) -> Result<()>;
}
