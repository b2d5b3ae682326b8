//! Task model - the unit of work whose completion drives project progress.

use serde::{Deserialize, Serialize};
use crate::error::{require_non_empty, ValidationError, ValidationResult};
use crate::id::{ProjectId, TaskId};
use crate::{Date, Time};

/// A task belongs to exactly one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Owning project
    pub project_id: ProjectId,

    /// Task title
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    #[serde(default)]
    pub priority: Priority,

    /// Due date
    #[serde(default)]
    pub due_date: Option<Date>,

    /// Self-reported progress (0-100). Informational; project progress
    /// is derived from status only.
    #[serde(default)]
    pub progress: u8,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,
}

impl Task {
    /// Create a new `Todo` task in a project.
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: TaskId::new(),
            project_id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::default(),
            due_date: None,
            progress: 0,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style status setter.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Change status and bump `updated_at`.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = chrono::Utc::now();
    }

    /// Check required fields and ranges.
    pub fn validate(&self) -> ValidationResult {
        require_non_empty("title", &self.title)?;
        if self.progress > 100 {
            return Err(ValidationError::OutOfRange {
                field: "progress".to_string(),
                value: i64::from(self.progress),
                min: 0,
                max: 100,
            });
        }
        Ok(())
    }
}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ValidationError::unknown("task status", s)),
        }
    }
}

/// Priority shared by projects and tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority
    #[default]
    Medium,
    /// High priority
    High,
}

impl Priority {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::unknown("priority", s)),
        }
    }
}

/// Filter for querying tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Only tasks of this project
    pub project_id: Option<ProjectId>,

    /// Filter by status
    pub status: Option<Vec<TaskStatus>>,
}

impl TaskFilter {
    /// Filter for every task of a project.
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            status: None,
        }
    }

    /// Whether a task passes this filter.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(project_id) = self.project_id {
            if task.project_id != project_id {
                return false;
            }
        }
        match &self.status {
            Some(statuses) => statuses.contains(&task.status),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_labels() {
        assert_eq!("In Progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let task = Task::new(ProjectId::new(), "  ");
        assert!(matches!(task.validate(), Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn test_filter_by_project_and_status() {
        let project = ProjectId::new();
        let done = Task::new(project, "a").with_status(TaskStatus::Completed);
        let other = Task::new(ProjectId::new(), "b");

        let filter = TaskFilter {
            project_id: Some(project),
            status: Some(vec![TaskStatus::Completed]),
        };
        assert!(filter.matches(&done));
        assert!(!filter.matches(&other));
        assert!(TaskFilter::default().matches(&other));
    }
}
