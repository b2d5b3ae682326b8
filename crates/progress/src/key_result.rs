//! Progress of a single key result.

use pacer_core::KeyResult;
use serde::{Deserialize, Serialize};

use crate::metric::percent;
use crate::status::{CompletionStatus, StatusDeriver};

/// Progress of one key result with its status flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyResultProgress {
    /// Progress toward target (0-100)
    pub progress: f64,
    /// Progress reached 100
    pub is_completed: bool,
    /// Progress at least 80
    pub is_on_track: bool,
    /// Progress in [60, 80)
    pub is_at_risk: bool,
    /// Progress below 60
    pub is_behind: bool,
    /// First matching bucket
    pub completion_status: CompletionStatus,
}

impl KeyResultProgress {
    /// Flags and bucket for a progress value.
    pub fn from_progress(progress: f64) -> Self {
        Self {
            progress,
            is_completed: StatusDeriver::is_completed(progress),
            is_on_track: StatusDeriver::is_on_track(progress),
            is_at_risk: StatusDeriver::is_at_risk(progress),
            is_behind: StatusDeriver::is_behind(progress),
            completion_status: StatusDeriver::completion_status(progress),
        }
    }
}

/// Computes [`KeyResultProgress`].
pub struct KeyResultTracker;

impl KeyResultTracker {
    /// Progress from baseline toward target.
    ///
    /// `direction` is not consulted: a `Decrease` key result whose target is
    /// above its baseline gains nothing from falling values.
    pub fn progress(kr: &KeyResult) -> f64 {
        percent(kr.current, kr.baseline, kr.target)
    }

    /// Progress plus status flags.
    pub fn evaluate(kr: &KeyResult) -> KeyResultProgress {
        KeyResultProgress::from_progress(Self::progress(kr))
    }

    /// Set the current value and recompute.
    ///
    /// Only the value is changed. When the result reports `is_completed`,
    /// the caller owns moving the key result's status to completed.
    pub fn update_current_value(kr: &mut KeyResult, value: f64) -> KeyResultProgress {
        kr.current = value;
        Self::evaluate(kr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_core::{Direction, KeyResultStatus};

    #[test]
    fn test_eighty_percent_is_on_track() {
        let kr = KeyResult::new("Signups", 0.0, 100.0).with_current(80.0);
        let progress = KeyResultTracker::evaluate(&kr);
        assert_eq!(progress.progress, 80.0);
        assert!(progress.is_on_track);
        assert!(!progress.is_completed);
        assert_eq!(progress.completion_status, CompletionStatus::OnTrack);
        assert_eq!(progress.completion_status.as_str(), "on_track");
    }

    #[test]
    fn test_baseline_offset() {
        let kr = KeyResult::new("NPS", 20.0, 60.0).with_current(46.0);
        let progress = KeyResultTracker::evaluate(&kr);
        assert!((progress.progress - 65.0).abs() < 1e-9);
        assert!(progress.is_at_risk);
        assert_eq!(progress.completion_status, CompletionStatus::AtRisk);
    }

    #[test]
    fn test_degenerate_range_is_behind() {
        let kr = KeyResult::new("Flat", 5.0, 5.0).with_current(9.0);
        let progress = KeyResultTracker::evaluate(&kr);
        assert_eq!(progress.progress, 0.0);
        assert!(progress.is_behind);
    }

    #[test]
    fn test_decrease_direction_does_not_invert() {
        let mut kr = KeyResult::new("Bugs", 0.0, 100.0).with_current(-50.0);
        kr.direction = Direction::Decrease;
        assert_eq!(KeyResultTracker::progress(&kr), 0.0);
    }

    #[test]
    fn test_update_current_value_signals_completion() {
        let mut kr = KeyResult::new("Revenue", 0.0, 1000.0);
        let progress = KeyResultTracker::update_current_value(&mut kr, 1200.0);
        assert_eq!(kr.current, 1200.0);
        assert_eq!(progress.progress, 100.0);
        assert!(progress.is_completed);
        assert_eq!(progress.completion_status, CompletionStatus::Completed);
        // Status transition is left to the caller.
        assert_eq!(kr.status, KeyResultStatus::Active);
    }
}
