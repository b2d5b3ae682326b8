//! Pacer core data models.
//!
//! Plain value records for projects, tasks, OKRs and KPIs, plus the
//! role-permission table and application settings. Progress computation
//! lives in `pacer-progress`; persistence in `pacer-storage`.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Work tracking
mod project;
mod task;

// Goal tracking
mod okr;
mod kpi;

// Access and configuration
mod permission;
mod settings;

// Re-exports
pub use id::*;
pub use error::{ValidationError, ValidationResult};

// Project & Task
pub use project::{Project, ProjectStatus};
pub use task::{Task, TaskStatus, TaskFilter, Priority};

// OKR & KPI
pub use okr::{Objective, ObjectiveKind, ObjectiveStatus, KeyResult, KeyResultStatus, Direction};
pub use kpi::{Kpi, KpiStatus, Frequency};

// Permissions & Settings
pub use permission::{Permission, Role};
pub use settings::{Settings, Theme, BackupFrequency, ExportFormat};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar date type
pub type Date = chrono::NaiveDate;
