//! OKR model - an objective measured by weighted key results.

use serde::{Deserialize, Serialize};
use crate::error::{
    require_date_order, require_finite, require_non_empty, ValidationError, ValidationResult,
};
use crate::id::{KeyResultId, ObjectiveId, ProjectId};
use crate::{Date, Time};

/// Intended movement of a tracked metric.
///
/// Recorded for display; progress is always measured from baseline toward
/// target regardless of direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Metric should go up
    #[default]
    Increase,
    /// Metric should go down
    Decrease,
    /// Metric should hold steady
    Maintain,
}

impl Direction {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "maintain" => Ok(Self::Maintain),
            _ => Err(ValidationError::unknown("direction", s)),
        }
    }
}

/// A measurable outcome contributing to an objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResult {
    /// Unique identifier
    pub id: KeyResultId,

    /// Title
    pub title: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Unit label ("%", "users", ...)
    #[serde(default)]
    pub unit: String,

    /// Starting value
    #[serde(default)]
    pub baseline: f64,

    /// Latest measured value
    #[serde(default)]
    pub current: f64,

    /// Value that counts as done
    pub target: f64,

    /// Intended movement
    #[serde(default)]
    pub direction: Direction,

    /// Lifecycle status
    #[serde(default)]
    pub status: KeyResultStatus,

    /// Relative weight inside its objective (>= 1)
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl KeyResult {
    /// Create an active key result with weight 1, starting at its baseline.
    pub fn new(title: impl Into<String>, baseline: f64, target: f64) -> Self {
        Self {
            id: KeyResultId::new(),
            title: title.into(),
            description: String::new(),
            unit: String::new(),
            baseline,
            current: baseline,
            target,
            direction: Direction::default(),
            status: KeyResultStatus::default(),
            weight: default_weight(),
        }
    }

    /// Builder-style current value setter.
    pub fn with_current(mut self, current: f64) -> Self {
        self.current = current;
        self
    }

    /// Builder-style weight setter.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Check weight, numeric fields and title.
    pub fn validate(&self) -> ValidationResult {
        require_non_empty("key_result.title", &self.title)?;
        require_finite("key_result.baseline", self.baseline)?;
        require_finite("key_result.current", self.current)?;
        require_finite("key_result.target", self.target)?;
        if self.weight == 0 {
            return Err(ValidationError::ZeroWeight {
                field: format!("key_result[{}].weight", self.id),
            });
        }
        Ok(())
    }
}

/// Key result status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyResultStatus {
    /// Counted toward the objective
    #[default]
    Active,
    /// Target reached
    Completed,
    /// Dropped; excluded from objective progress
    Cancelled,
}

/// An objective tracked over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    /// Unique identifier
    pub id: ObjectiveId,

    /// Owning project, if any
    #[serde(default)]
    pub project_id: Option<ProjectId>,

    /// The objective statement
    pub objective: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Scope of the objective
    #[serde(default)]
    pub kind: ObjectiveKind,

    /// Lifecycle status
    #[serde(default)]
    pub status: ObjectiveStatus,

    /// Window start
    pub start_date: Date,

    /// Window end; a default window applies when absent
    #[serde(default)]
    pub end_date: Option<Date>,

    /// Key results, in display order
    #[serde(default)]
    pub key_results: Vec<KeyResult>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Objective {
    /// Create an active objective without key results.
    pub fn new(objective: impl Into<String>, start_date: Date) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ObjectiveId::new(),
            project_id: None,
            objective: objective.into(),
            description: String::new(),
            category: String::new(),
            kind: ObjectiveKind::default(),
            status: ObjectiveStatus::default(),
            start_date,
            end_date: None,
            key_results: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Key results that count toward overall progress (cancelled ones do not).
    pub fn counted_key_results(&self) -> Vec<KeyResult> {
        self.key_results
            .iter()
            .filter(|kr| kr.status != KeyResultStatus::Cancelled)
            .cloned()
            .collect()
    }

    /// Find a key result by ID.
    pub fn key_result_mut(&mut self, id: KeyResultId) -> Option<&mut KeyResult> {
        self.key_results.iter_mut().find(|kr| kr.id == id)
    }

    /// Check the objective and every key result.
    pub fn validate(&self) -> ValidationResult {
        require_non_empty("objective", &self.objective)?;
        require_date_order(self.start_date, self.end_date)?;
        for kr in &self.key_results {
            kr.validate()?;
        }
        Ok(())
    }
}

/// Scope of an objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Company-wide objective
    Company,
    /// Team objective
    Team,
    /// Personal objective
    #[default]
    Individual,
}

impl ObjectiveKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Team => "team",
            Self::Individual => "individual",
        }
    }
}

impl std::str::FromStr for ObjectiveKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "team" => Ok(Self::Team),
            "individual" => Ok(Self::Individual),
            _ => Err(ValidationError::unknown("objective kind", s)),
        }
    }
}

/// Objective status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    /// In progress
    #[default]
    Active,
    /// Closed as achieved
    Completed,
    /// Abandoned
    Cancelled,
}

impl ObjectiveStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}
