//! Project model - container whose progress is derived from its tasks.

use serde::{Deserialize, Serialize};
use crate::error::{require_non_empty, ValidationError, ValidationResult};
use crate::id::ProjectId;
use crate::task::Priority;
use crate::{Date, Time};

/// A project groups tasks and carries a persisted progress/status pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Persisted completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Due date
    #[serde(default)]
    pub due_date: Option<Date>,

    /// Priority
    #[serde(default)]
    pub priority: Priority,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Project {
    /// Create a new project in `Planning`.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::Planning,
            progress: 0,
            due_date: None,
            priority: Priority::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A project is overdue when its due date has passed and it is not completed.
    pub fn is_overdue(&self, today: Date) -> bool {
        match self.due_date {
            Some(due) => due < today && self.status != ProjectStatus::Completed,
            None => false,
        }
    }

    /// Check required fields and ranges.
    pub fn validate(&self) -> ValidationResult {
        require_non_empty("name", &self.name)?;
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

/// Project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// No work completed yet
    Planning,
    /// Some tasks completed
    InProgress,
    /// Every task completed
    Completed,
    /// Paused manually
    OnHold,
}

impl ProjectStatus {
    /// All statuses in display order.
    pub const ALL: [ProjectStatus; 4] = [
        Self::Planning,
        Self::InProgress,
        Self::Completed,
        Self::OnHold,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "planning" => Ok(Self::Planning),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on_hold" => Ok(Self::OnHold),
            _ => Err(ValidationError::unknown("project status", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overdue_requires_past_due_and_open_status() {
        let today = date(2025, 8, 1);
        let mut project = Project::new("Website");
        assert!(!project.is_overdue(today));

        project.due_date = Some(date(2025, 7, 31));
        assert!(project.is_overdue(today));

        project.status = ProjectStatus::Completed;
        assert!(!project.is_overdue(today));

        project.status = ProjectStatus::OnHold;
        project.due_date = Some(today);
        assert!(!project.is_overdue(today));
    }

    #[test]
    fn test_status_parse_accepts_labels() {
        assert_eq!("On Hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert_eq!("in_progress".parse::<ProjectStatus>().unwrap(), ProjectStatus::InProgress);
        assert!("archived".parse::<ProjectStatus>().is_err());
    }
}
