//! Objective and KPI progress paced against elapsed time.

use pacer_core::{Date, KeyResult, Kpi};
use serde::{Deserialize, Serialize};

use crate::key_result::KeyResultTracker;
use crate::metric::{clamp, percent, weighted_mean};
use crate::status::{CompletionStatus, StatusDeriver};

/// Window assumed for an objective without an end date.
pub const OBJECTIVE_DEFAULT_WINDOW_DAYS: i64 = 90;

/// Window assumed for a KPI without an end date.
pub const KPI_DEFAULT_WINDOW_DAYS: i64 = 30;

/// Where a time window stands on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    /// Whole days since the window started (never negative)
    pub days_elapsed: i64,
    /// Elapsed plus remaining days, or the default window
    pub total_days: i64,
    /// Progress expected by now (0-100)
    pub expected_progress: f64,
}

impl Pacing {
    /// Pace a window `[start, end]` as of `today`.
    ///
    /// Without an end date the window is `default_window` days long. Once the
    /// window is used up (or has no length) the expectation is 100.
    pub fn compute(start: Date, end: Option<Date>, today: Date, default_window: i64) -> Self {
        let days_elapsed = (today - start).num_days().max(0);
        let total_days = match end {
            Some(end) => days_elapsed + (end - today).num_days(),
            None => default_window,
        };
        let expected_progress = if total_days > 0 {
            clamp(days_elapsed as f64 / total_days as f64 * 100.0, 0.0, 100.0)
        } else {
            100.0
        };
        Self {
            days_elapsed,
            total_days,
            expected_progress,
        }
    }

    /// Progress meets or beats the expectation.
    pub fn is_on_track(&self, progress: f64) -> bool {
        progress >= self.expected_progress
    }
}

/// Result of pacing an objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    /// Weighted mean of key-result progress (0-100)
    pub overall_progress: f64,
    /// Overall progress keeps pace with elapsed time
    pub is_on_track: bool,
    /// Bucket for `overall_progress`
    pub completion_status: CompletionStatus,
    /// Pacing details
    pub pacing: Pacing,
}

/// Result of pacing a KPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiProgress {
    /// Progress toward target (0-100)
    pub progress: f64,
    /// Progress keeps pace with elapsed time
    pub is_on_track: bool,
    /// Bucket for `progress`
    pub completion_status: CompletionStatus,
    /// Pacing details
    pub pacing: Pacing,
}

/// Aggregates key results and paces objectives and KPIs.
pub struct ObjectivePacingEngine;

impl ObjectivePacingEngine {
    /// Weighted mean of each key result's progress; 0 for no key results.
    pub fn overall_progress(key_results: &[KeyResult]) -> f64 {
        let weighted: Vec<(f64, u32)> = key_results
            .iter()
            .map(|kr| (KeyResultTracker::progress(kr), kr.weight))
            .collect();
        weighted_mean(&weighted)
    }

    /// Pace an objective's key results over `[start, end]` as of `today`.
    pub fn objective(
        key_results: &[KeyResult],
        start: Date,
        end: Option<Date>,
        today: Date,
    ) -> ObjectiveProgress {
        let overall_progress = Self::overall_progress(key_results);
        let pacing = Pacing::compute(start, end, today, OBJECTIVE_DEFAULT_WINDOW_DAYS);
        ObjectiveProgress {
            overall_progress,
            is_on_track: pacing.is_on_track(overall_progress),
            completion_status: StatusDeriver::completion_status(overall_progress),
            pacing,
        }
    }

    /// Pace a KPI as of `today`.
    pub fn kpi(kpi: &Kpi, today: Date) -> KpiProgress {
        let progress = percent(kpi.current, kpi.baseline, kpi.target);
        let pacing = Pacing::compute(kpi.start_date, kpi.end_date, today, KPI_DEFAULT_WINDOW_DAYS);
        KpiProgress {
            progress,
            is_on_track: pacing.is_on_track(progress),
            completion_status: StatusDeriver::completion_status(progress),
            pacing,
        }
    }
}
