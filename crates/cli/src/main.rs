//! Pacer CLI - project, OKR and KPI progress tracking.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use pacer_core::{
    Date, Direction, Frequency, KeyResult, KeyResultId, Kpi, KpiId, Objective, ObjectiveId,
    ObjectiveKind, Permission, Priority, Project, ProjectId, Role, Task, TaskFilter, TaskId,
    TaskStatus,
};
use pacer_progress::{BasicProgressTracker, ProgressTracker};
use pacer_storage::{JsonStorage, ReloadPolicy, SettingsStore, Storage};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pacer")]
#[command(about = "Project, OKR and KPI progress tracking", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".pacer")]
    dir: PathBuf,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Evaluate pacing as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    today: Option<Date>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage objectives
    #[command(subcommand)]
    Okr(OkrCommand),
    /// Manage key results
    #[command(subcommand)]
    Kr(KrCommand),
    /// Manage KPIs
    #[command(subcommand)]
    Kpi(KpiCommand),
    /// Show portfolio statistics
    Stats,
    /// Manage application settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Check whether a role holds a permission
    Can {
        /// Role name
        role: Role,
        /// Permission name
        permission: Permission,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Add a project
    Add {
        /// Project name
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        due: Option<Date>,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// List projects
    List,
    /// Show a project with task-derived progress
    Show { id: ProjectId },
    /// Recompute and store a project's progress
    Refresh { id: ProjectId },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task to a project
    Add {
        project: ProjectId,
        title: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        due: Option<Date>,
    },
    /// Change a task's status and refresh its project
    Status { id: TaskId, status: TaskStatus },
    /// Delete a task and refresh its project
    Delete { id: TaskId },
    /// List tasks
    List {
        #[arg(long)]
        project: Option<ProjectId>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
}

#[derive(Subcommand)]
enum OkrCommand {
    /// Add an objective
    Add {
        objective: String,
        #[arg(long)]
        start: Option<Date>,
        #[arg(long)]
        end: Option<Date>,
        #[arg(long, default_value = "individual")]
        kind: ObjectiveKind,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Show an objective with pacing
    Show { id: ObjectiveId },
}

#[derive(Subcommand)]
enum KrCommand {
    /// Add a key result to an objective
    Add {
        objective: ObjectiveId,
        title: String,
        #[arg(long, default_value_t = 0.0)]
        baseline: f64,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long, default_value_t = 1)]
        weight: u32,
        #[arg(long, default_value = "increase")]
        direction: Direction,
    },
    /// Set a key result's current value
    Update {
        objective: ObjectiveId,
        id: KeyResultId,
        value: f64,
    },
}

#[derive(Subcommand)]
enum KpiCommand {
    /// Add a KPI
    Add {
        name: String,
        #[arg(long, default_value_t = 0.0)]
        baseline: f64,
        #[arg(long)]
        target: f64,
        #[arg(long)]
        start: Option<Date>,
        #[arg(long)]
        end: Option<Date>,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "monthly")]
        frequency: Frequency,
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Set a KPI's current value
    Update { id: KpiId, value: f64 },
    /// Show a KPI with pacing
    Show { id: KpiId },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,
    /// Set one setting by its camelCase key
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());

    match cli.command {
        Commands::Project(cmd) => project(&mut open(&cli.dir).await?, cmd, cli.json).await?,
        Commands::Task(cmd) => task(&mut open(&cli.dir).await?, cmd).await?,
        Commands::Okr(cmd) => okr(&mut open(&cli.dir).await?, cmd, today, cli.json).await?,
        Commands::Kr(cmd) => kr(&mut open(&cli.dir).await?, cmd).await?,
        Commands::Kpi(cmd) => kpi(&mut open(&cli.dir).await?, cmd, today, cli.json).await?,
        Commands::Stats => {
            let stats = open(&cli.dir).await?.statistics(today).await?;
            if cli.json {
                print_json(&stats)?;
            } else {
                let p = &stats.projects;
                println!("Projects: {} ({} overdue)", p.total, p.overdue);
                let o = &stats.objectives;
                println!(
                    "Objectives: {} total, {} active, {} completed, {} on track, {} at risk",
                    o.total, o.active, o.completed, o.on_track, o.at_risk
                );
                let k = &stats.kpis;
                println!(
                    "KPIs: {} total, {} active, {} completed, {} on track, {} at risk",
                    k.total, k.active, k.completed, k.on_track, k.at_risk
                );
            }
        }
        Commands::Settings(cmd) => settings(&cli.dir, cmd).await?,
        Commands::Can { role, permission } => {
            println!(
                "{} {} {}: {}",
                role,
                if role.allows(permission) { "can" } else { "cannot" },
                permission,
                permission.description()
            );
        }
    }

    Ok(())
}

type Tracker = BasicProgressTracker<JsonStorage>;

async fn open(dir: &Path) -> Result<Tracker> {
    Ok(BasicProgressTracker::new(JsonStorage::new(dir).await?))
}

async fn project(tracker: &mut Tracker, cmd: ProjectCommand, json: bool) -> Result<()> {
    match cmd {
        ProjectCommand::Add { name, description, due, priority } => {
            let mut project = Project::new(name);
            project.description = description;
            project.due_date = due;
            project.priority = priority;
            tracker.storage_mut().save_project(&project).await?;
            tracker.storage_mut().commit("Add project").await?;
            println!("Added project: {} - {}", project.id, project.name);
        }
        ProjectCommand::List => {
            let projects = tracker.storage().list_projects().await?;
            if json {
                return print_json(&projects);
            }
            println!("Projects ({})", projects.len());
            for project in projects {
                println!(
                    "  {} | {} | {:>3}% - {}",
                    project.id, project.status, project.progress, project.name
                );
            }
        }
        ProjectCommand::Show { id } => {
            let report = tracker.project_report(id).await?;
            if json {
                return print_json(&report);
            }
            let project = &report.project;
            println!("Project: {}", project.id);
            println!("  Name: {}", project.name);
            println!("  Status: {}", project.status);
            println!("  Stored progress: {}%", project.progress);
            println!(
                "  Derived: {}% ({})",
                report.progress.percent_complete, report.progress.derived_status
            );
            println!(
                "  Tasks: {} total, {} completed, {} in progress, {} todo",
                report.tasks.total, report.tasks.completed, report.tasks.in_progress, report.tasks.todo
            );
            if let Some(due) = project.due_date {
                println!("  Due: {}", due);
            }
        }
        ProjectCommand::Refresh { id } => {
            let progress = tracker.refresh_project(id).await?;
            println!("{}% ({})", progress.percent_complete, progress.derived_status);
        }
    }
    Ok(())
}

async fn task(tracker: &mut Tracker, cmd: TaskCommand) -> Result<()> {
    match cmd {
        TaskCommand::Add { project, title, priority, due } => {
            if tracker.storage().load_project(project).await?.is_none() {
                return Err(anyhow!("Project not found: {}", project));
            }
            let mut task = Task::new(project, title);
            task.priority = priority;
            task.due_date = due;
            tracker.storage_mut().save_task(&task).await?;
            tracker.storage_mut().commit("Add task").await?;
            println!("Added task: {} - {}", task.id, task.title);
            tracker.refresh_project(project).await?;
        }
        TaskCommand::Status { id, status } => {
            let mut task = tracker
                .storage()
                .load_task(id)
                .await?
                .ok_or_else(|| anyhow!("Task not found: {}", id))?;
            task.set_status(status);
            tracker.storage_mut().save_task(&task).await?;
            tracker.storage_mut().commit("Update task status").await?;
            let progress = tracker.refresh_project(task.project_id).await?;
            info!("Task {} is now {}", task.id, task.status);
            println!(
                "Project {}: {}% ({})",
                task.project_id, progress.percent_complete, progress.derived_status
            );
        }
        TaskCommand::Delete { id } => {
            let progress = tracker.delete_task(id).await?;
            println!(
                "Deleted task {}. Project now {}% ({})",
                id, progress.percent_complete, progress.derived_status
            );
        }
        TaskCommand::List { project, status } => {
            let filter = TaskFilter {
                project_id: project,
                status: status.map(|s| vec![s]),
            };
            let tasks = tracker.storage().list_tasks(&filter).await?;
            println!("Tasks ({})", tasks.len());
            for task in tasks {
                println!(
                    "  {} | {} | {} - {}",
                    task.id, task.status, task.priority.as_str(), task.title
                );
            }
        }
    }
    Ok(())
}

async fn okr(tracker: &mut Tracker, cmd: OkrCommand, today: Date, json: bool) -> Result<()> {
    match cmd {
        OkrCommand::Add { objective, start, end, kind, category, project } => {
            let mut record = Objective::new(objective, start.unwrap_or(today));
            record.end_date = end;
            record.kind = kind;
            record.category = category;
            record.project_id = project;
            tracker.storage_mut().save_objective(&record).await?;
            tracker.storage_mut().commit("Add objective").await?;
            println!("Added objective: {} - {}", record.id, record.objective);
        }
        OkrCommand::Show { id } => {
            let report = tracker.objective_report(id, today).await?;
            if json {
                return print_json(&report);
            }
            let progress = &report.progress;
            println!("Objective: {}", report.objective.id);
            println!("  {}", report.objective.objective);
            println!(
                "  Progress: {:.1}% ({}), expected {:.1}% -> {}",
                progress.overall_progress,
                progress.completion_status,
                progress.pacing.expected_progress,
                if progress.is_on_track { "on track" } else { "behind pace" }
            );
            println!(
                "  Day {} of {}",
                progress.pacing.days_elapsed, progress.pacing.total_days
            );
            for (kr, (_, kr_progress)) in report.objective.key_results.iter().zip(&report.key_results) {
                println!(
                    "  - {} | {:.1}% | {} | {} / {} {}",
                    kr.id, kr_progress.progress, kr_progress.completion_status, kr.current, kr.target, kr.unit
                );
            }
        }
    }
    Ok(())
}

async fn kr(tracker: &mut Tracker, cmd: KrCommand) -> Result<()> {
    match cmd {
        KrCommand::Add { objective, title, baseline, target, unit, weight, direction } => {
            let mut record = tracker
                .storage()
                .load_objective(objective)
                .await?
                .ok_or_else(|| anyhow!("Objective not found: {}", objective))?;
            let mut kr = KeyResult::new(title, baseline, target).with_weight(weight);
            kr.unit = unit;
            kr.direction = direction;
            let kr_id = kr.id;
            record.key_results.push(kr);
            record.updated_at = Utc::now();
            tracker.storage_mut().save_objective(&record).await?;
            tracker.storage_mut().commit("Add key result").await?;
            println!("Added key result: {}", kr_id);
        }
        KrCommand::Update { objective, id, value } => {
            let progress = tracker.update_key_result(objective, id, value).await?;
            println!("{:.1}% ({})", progress.progress, progress.completion_status);
        }
    }
    Ok(())
}

async fn kpi(tracker: &mut Tracker, cmd: KpiCommand, today: Date, json: bool) -> Result<()> {
    match cmd {
        KpiCommand::Add {
            name,
            baseline,
            target,
            start,
            end,
            unit,
            category,
            frequency,
            project,
        } => {
            let mut record = Kpi::new(name, baseline, target, start.unwrap_or(today));
            record.end_date = end;
            record.unit = unit;
            record.category = category;
            record.frequency = frequency;
            record.project_id = project;
            tracker.storage_mut().save_kpi(&record).await?;
            tracker.storage_mut().commit("Add KPI").await?;
            println!("Added KPI: {} - {}", record.id, record.name);
        }
        KpiCommand::Update { id, value } => {
            let progress = tracker.update_kpi(id, value, today).await?;
            println!(
                "{:.1}% ({}), expected {:.1}%",
                progress.progress, progress.completion_status, progress.pacing.expected_progress
            );
        }
        KpiCommand::Show { id } => {
            let report = tracker.kpi_report(id, today).await?;
            if json {
                return print_json(&report);
            }
            let (kpi, progress) = (&report.kpi, &report.progress);
            println!("KPI: {}", kpi.id);
            println!("  Name: {}", kpi.name);
            println!("  Value: {} / {} {}", kpi.current, kpi.target, kpi.unit);
            println!(
                "  Progress: {:.1}% ({}), expected {:.1}% -> {}",
                progress.progress,
                progress.completion_status,
                progress.pacing.expected_progress,
                if progress.is_on_track { "on track" } else { "behind pace" }
            );
        }
    }
    Ok(())
}

async fn settings(dir: &Path, cmd: SettingsCommand) -> Result<()> {
    let store = SettingsStore::new(dir.join("settings.json"), ReloadPolicy::Always);
    match cmd {
        SettingsCommand::Show => print_json(&store.get().await?)?,
        SettingsCommand::Set { key, value } => {
            store.update(&key, &value).await?;
            println!("Updated {}", key);
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
