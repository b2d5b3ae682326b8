//! KPI model - a single operational metric paced against time.

use serde::{Deserialize, Serialize};
use crate::error::{
    require_date_order, require_finite, require_non_empty, ValidationError, ValidationResult,
};
use crate::id::{KpiId, ProjectId};
use crate::okr::Direction;
use crate::{Date, Time};

/// A key performance indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kpi {
    /// Unique identifier
    pub id: KpiId,

    /// Owning project, if any
    #[serde(default)]
    pub project_id: Option<ProjectId>,

    /// Name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Unit label
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

    /// Measurement cadence
    #[serde(default)]
    pub frequency: Frequency,

    /// Intended movement
    #[serde(default)]
    pub direction: Direction,

    /// Lifecycle status
    #[serde(default)]
    pub status: KpiStatus,

    /// Window start
    pub start_date: Date,

    /// Window end; a default window applies when absent
    #[serde(default)]
    pub end_date: Option<Date>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Kpi {
    /// Create an active KPI starting at its baseline.
    pub fn new(name: impl Into<String>, baseline: f64, target: f64, start_date: Date) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: KpiId::new(),
            project_id: None,
            name: name.into(),
            description: String::new(),
            category: String::new(),
            unit: String::new(),
            baseline,
            current: baseline,
            target,
            frequency: Frequency::default(),
            direction: Direction::default(),
            status: KpiStatus::default(),
            start_date,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style current value setter.
    pub fn with_current(mut self, current: f64) -> Self {
        self.current = current;
        self
    }

    /// Check required fields, numeric fields and the date window.
    pub fn validate(&self) -> ValidationResult {
        require_non_empty("name", &self.name)?;
        require_finite("baseline", self.baseline)?;
        require_finite("current", self.current)?;
        require_finite("target", self.target)?;
        require_date_order(self.start_date, self.end_date)
    }
}

/// How often a KPI is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Measured every day
    Daily,
    /// Measured every week
    Weekly,
    /// Measured every month
    #[default]
    Monthly,
    /// Measured every quarter
    Quarterly,
    /// Measured every year
    Yearly,
}

impl std::str::FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ValidationError::unknown("frequency", s)),
        }
    }
}

/// KPI status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiStatus {
    /// Being measured
    #[default]
    Active,
    /// Temporarily not measured
    Paused,
    /// Target reached
    Completed,
    /// No longer tracked
    Cancelled,
}

impl KpiStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}
