//! Qualitative status buckets derived from numeric progress.
//!
//! Every threshold used by the engine lives here.

use pacer_core::ProjectStatus;
use serde::{Deserialize, Serialize};

/// Progress at or above which work counts as completed.
pub const COMPLETED_THRESHOLD: f64 = 100.0;

/// Progress at or above which work counts as on track.
pub const ON_TRACK_THRESHOLD: f64 = 80.0;

/// Progress at or above which work counts as at risk rather than behind.
pub const AT_RISK_THRESHOLD: f64 = 60.0;

/// Four-tier completion bucket for key results, objectives and KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Progress >= 100
    Completed,
    /// 80 <= progress < 100
    OnTrack,
    /// 60 <= progress < 80
    AtRisk,
    /// progress < 60
    Behind,
}

impl CompletionStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::OnTrack => "on_track",
            Self::AtRisk => "at_risk",
            Self::Behind => "behind",
        }
    }
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps numeric progress onto status buckets.
pub struct StatusDeriver;

impl StatusDeriver {
    /// `progress >= 100`
    pub fn is_completed(progress: f64) -> bool {
        progress >= COMPLETED_THRESHOLD
    }

    /// `progress >= 80`; also true for completed work.
    pub fn is_on_track(progress: f64) -> bool {
        progress >= ON_TRACK_THRESHOLD
    }

    /// `60 <= progress < 80`
    pub fn is_at_risk(progress: f64) -> bool {
        progress >= AT_RISK_THRESHOLD && progress < ON_TRACK_THRESHOLD
    }

    /// `progress < 60`
    pub fn is_behind(progress: f64) -> bool {
        progress < AT_RISK_THRESHOLD
    }

    /// First matching bucket in order Completed, OnTrack, AtRisk, Behind.
    pub fn completion_status(progress: f64) -> CompletionStatus {
        if Self::is_completed(progress) {
            CompletionStatus::Completed
        } else if Self::is_on_track(progress) {
            CompletionStatus::OnTrack
        } else if Self::is_at_risk(progress) {
            CompletionStatus::AtRisk
        } else {
            CompletionStatus::Behind
        }
    }

    /// Project status for a completion percentage.
    pub fn project_status(percent_complete: u8) -> ProjectStatus {
        match percent_complete {
            p if p >= 100 => ProjectStatus::Completed,
            0 => ProjectStatus::Planning,
            _ => ProjectStatus::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_buckets() {
        assert_eq!(StatusDeriver::completion_status(100.0), CompletionStatus::Completed);
        assert_eq!(StatusDeriver::completion_status(99.9), CompletionStatus::OnTrack);
        assert_eq!(StatusDeriver::completion_status(80.0), CompletionStatus::OnTrack);
        assert_eq!(StatusDeriver::completion_status(79.99), CompletionStatus::AtRisk);
        assert_eq!(StatusDeriver::completion_status(60.0), CompletionStatus::AtRisk);
        assert_eq!(StatusDeriver::completion_status(59.0), CompletionStatus::Behind);
        assert_eq!(StatusDeriver::completion_status(0.0), CompletionStatus::Behind);
    }

    #[test]
    fn test_predicates_overlap_only_at_top() {
        assert!(StatusDeriver::is_on_track(100.0));
        assert!(StatusDeriver::is_completed(100.0));
        assert!(!StatusDeriver::is_at_risk(80.0));
        assert!(!StatusDeriver::is_behind(60.0));
    }

    #[test]
    fn test_project_buckets() {
        assert_eq!(StatusDeriver::project_status(0), ProjectStatus::Planning);
        assert_eq!(StatusDeriver::project_status(1), ProjectStatus::InProgress);
        assert_eq!(StatusDeriver::project_status(99), ProjectStatus::InProgress);
        assert_eq!(StatusDeriver::project_status(100), ProjectStatus::Completed);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(CompletionStatus::OnTrack.as_str(), "on_track");
        assert_eq!(
            serde_json::to_string(&CompletionStatus::AtRisk).unwrap(),
            "\"at_risk\""
        );
    }
}
