//! Portfolio-level rollups over projects, objectives and KPIs.

use std::collections::HashMap;
use pacer_core::{
    Date, Kpi, KpiStatus, Objective, ObjectiveKind, ObjectiveStatus, Project, ProjectStatus,
};
use serde::Serialize;

use crate::pacing::ObjectivePacingEngine;

/// Project counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectStats {
    /// All projects
    pub total: usize,
    /// Projects by status
    pub by_status: HashMap<ProjectStatus, usize>,
    /// Past due date and not completed
    pub overdue: usize,
}

impl ProjectStats {
    /// Roll up `projects` as of `today`.
    pub fn collect(projects: &[Project], today: Date) -> Self {
        let mut stats = Self::default();
        for project in projects {
            stats.total += 1;
            *stats.by_status.entry(project.status).or_default() += 1;
            if project.is_overdue(today) {
                stats.overdue += 1;
            }
        }
        stats
    }

    /// Count for one status.
    pub fn count(&self, status: ProjectStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Objective counts. On-track and at-risk consider active objectives only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectiveStats {
    /// All objectives
    pub total: usize,
    /// Active objectives
    pub active: usize,
    /// Completed objectives
    pub completed: usize,
    /// Active and keeping pace
    pub on_track: usize,
    /// Active and behind pace
    pub at_risk: usize,
    /// Objectives by kind
    pub by_kind: HashMap<ObjectiveKind, usize>,
    /// Objectives by status
    pub by_status: HashMap<ObjectiveStatus, usize>,
}

impl ObjectiveStats {
    /// Roll up `objectives` as of `today`.
    pub fn collect(objectives: &[Objective], today: Date) -> Self {
        let mut stats = Self::default();
        for objective in objectives {
            stats.total += 1;
            *stats.by_kind.entry(objective.kind).or_default() += 1;
            *stats.by_status.entry(objective.status).or_default() += 1;
            match objective.status {
                ObjectiveStatus::Active => {
                    stats.active += 1;
                    let progress = ObjectivePacingEngine::objective(
                        &objective.counted_key_results(),
                        objective.start_date,
                        objective.end_date,
                        today,
                    );
                    if progress.is_on_track {
                        stats.on_track += 1;
                    } else {
                        stats.at_risk += 1;
                    }
                }
                ObjectiveStatus::Completed => stats.completed += 1,
                ObjectiveStatus::Cancelled => {}
            }
        }
        stats
    }
}

/// KPI counts. On-track and at-risk consider active KPIs only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KpiStats {
    /// All KPIs
    pub total: usize,
    /// Active KPIs
    pub active: usize,
    /// Completed KPIs
    pub completed: usize,
    /// Active and keeping pace
    pub on_track: usize,
    /// Active and behind pace
    pub at_risk: usize,
    /// KPIs by category label
    pub by_category: HashMap<String, usize>,
    /// KPIs by status
    pub by_status: HashMap<KpiStatus, usize>,
}

impl KpiStats {
    /// Roll up `kpis` as of `today`.
    pub fn collect(kpis: &[Kpi], today: Date) -> Self {
        let mut stats = Self::default();
        for kpi in kpis {
            stats.total += 1;
            *stats.by_category.entry(kpi.category.clone()).or_default() += 1;
            *stats.by_status.entry(kpi.status).or_default() += 1;
            match kpi.status {
                KpiStatus::Active => {
                    stats.active += 1;
                    if ObjectivePacingEngine::kpi(kpi, today).is_on_track {
                        stats.on_track += 1;
                    } else {
                        stats.at_risk += 1;
                    }
                }
                KpiStatus::Completed => stats.completed += 1,
                KpiStatus::Paused | KpiStatus::Cancelled => {}
            }
        }
        stats
    }
}

/// All rollups together.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    /// Project rollup
    pub projects: ProjectStats,
    /// Objective rollup
    pub objectives: ObjectiveStats,
    /// KPI rollup
    pub kpis: KpiStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use pacer_core::KeyResult;

    fn today() -> Date {
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    }

    #[test]
    fn test_project_stats() {
        let mut late = Project::new("Late");
        late.due_date = Some(today() - Duration::days(1));
        late.status = ProjectStatus::InProgress;
        let mut done = Project::new("Done");
        done.due_date = Some(today() - Duration::days(1));
        done.status = ProjectStatus::Completed;
        let fresh = Project::new("Fresh");

        let stats = ProjectStats::collect(&[late, done, fresh], today());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.count(ProjectStatus::Planning), 1);
        assert_eq!(stats.count(ProjectStatus::OnHold), 0);
    }

    #[test]
    fn test_objective_stats_only_pace_active() {
        let start = today() - Duration::days(45);

        let mut ahead = Objective::new("Ahead", start);
        ahead.key_results.push(KeyResult::new("kr", 0.0, 10.0).with_current(9.0));
        ahead.kind = ObjectiveKind::Company;

        let mut behind = Objective::new("Behind", start);
        behind.key_results.push(KeyResult::new("kr", 0.0, 10.0).with_current(1.0));

        let mut closed = Objective::new("Closed", start);
        closed.status = ObjectiveStatus::Completed;

        let mut dropped = Objective::new("Dropped", start);
        dropped.status = ObjectiveStatus::Cancelled;

        let stats = ObjectiveStats::collect(&[ahead, behind, closed, dropped], today());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.on_track, 1);
        assert_eq!(stats.at_risk, 1);
        assert_eq!(stats.by_kind.get(&ObjectiveKind::Company), Some(&1));
        assert_eq!(stats.by_kind.get(&ObjectiveKind::Individual), Some(&3));
        assert_eq!(stats.by_status.get(&ObjectiveStatus::Cancelled), Some(&1));
    }

    #[test]
    fn test_kpi_stats_skip_paused() {
        let start = today() - Duration::days(15);
        let mut on_pace = Kpi::new("Uptime", 0.0, 10.0, start).with_current(6.0);
        on_pace.category = "ops".to_string();
        let mut paused = Kpi::new("Churn", 0.0, 10.0, start);
        paused.status = KpiStatus::Paused;
        paused.category = "ops".to_string();
        let lagging = Kpi::new("Leads", 0.0, 10.0, start).with_current(1.0);

        let stats = KpiStats::collect(&[on_pace, paused, lagging], today());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.on_track, 1);
        assert_eq!(stats.at_risk, 1);
        assert_eq!(stats.by_category.get("ops"), Some(&2));
        assert_eq!(stats.by_status.get(&KpiStatus::Paused), Some(&1));
    }
}
