//! JSON file storage implementation.
//!
//! Stores one JSON file per record under the storage root and keeps small
//! per-object meta markers (version + updated_at).

use std::path::{Path, PathBuf};
use pacer_core::{
    Kpi, KpiId, Objective, ObjectiveId, Project, ProjectId, Task, TaskFilter, TaskId,
};
use serde::Serialize;
use super::{Storage, Result};
use tokio::fs;
use tracing::{debug, warn};

const KINDS: [&str; 4] = ["projects", "tasks", "okrs", "kpis"];

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the record and meta directories under `root`.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for kind in KINDS {
            fs::create_dir_all(root.join(kind)).await?;
            fs::create_dir_all(root.join("meta").join(kind)).await?;
        }

        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join(kind).join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    /// Current version of a record, 0 if never written.
    pub async fn version(&self, kind: &str, id: &str) -> Result<u64> {
        let meta: Option<serde_json::Value> = read_json(&self.meta_path(kind, id)).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }

    async fn write_record<T: Serialize + Sync>(&self, kind: &str, id: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.record_path(kind, id), json.as_bytes()).await?;
        let version = self.bump_version(kind, id).await?;
        debug!("Saved {}/{} (v{})", kind, id, version);
        Ok(())
    }

    async fn remove_record(&self, kind: &str, id: &str) -> Result<()> {
        remove_if_exists(&self.record_path(kind, id)).await?;
        remove_if_exists(&self.meta_path(kind, id)).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_project(&mut self, project: &Project) -> Result<()> {
        check("projects", &project.id.to_string(), project.validate())?;
        self.write_record("projects", &project.id.to_string(), project).await
    }

    async fn load_project(&self, id: ProjectId) -> Result<Option<Project>> {
        read_json(&self.record_path("projects", &id.to_string())).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects: Vec<Project> = list_dir(&self.root.join("projects")).await?;
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    /// Deleting a project deletes its tasks and detaches its OKRs and KPIs.
    async fn delete_project(&mut self, id: ProjectId) -> Result<()> {
        for task in self.list_tasks(&TaskFilter::for_project(id)).await? {
            self.remove_record("tasks", &task.id.to_string()).await?;
        }
        for mut objective in self.list_objectives().await? {
            if objective.project_id == Some(id) {
                objective.project_id = None;
                self.write_record("okrs", &objective.id.to_string(), &objective).await?;
            }
        }
        for mut kpi in self.list_kpis().await? {
            if kpi.project_id == Some(id) {
                kpi.project_id = None;
                self.write_record("kpis", &kpi.id.to_string(), &kpi).await?;
            }
        }
        self.remove_record("projects", &id.to_string()).await
    }

    async fn save_task(&mut self, task: &Task) -> Result<()> {
        check("tasks", &task.id.to_string(), task.validate())?;
        self.write_record("tasks", &task.id.to_string(), task).await
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        read_json(&self.record_path("tasks", &id.to_string())).await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let all: Vec<Task> = list_dir(&self.root.join("tasks")).await?;
        let mut tasks: Vec<Task> = all.into_iter().filter(|t| filter.matches(t)).collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.remove_record("tasks", &id.to_string()).await
    }

    async fn save_objective(&mut self, objective: &Objective) -> Result<()> {
        check("okrs", &objective.id.to_string(), objective.validate())?;
        self.write_record("okrs", &objective.id.to_string(), objective).await
    }

    async fn load_objective(&self, id: ObjectiveId) -> Result<Option<Objective>> {
        read_json(&self.record_path("okrs", &id.to_string())).await
    }

    async fn list_objectives(&self) -> Result<Vec<Objective>> {
        let mut objectives: Vec<Objective> = list_dir(&self.root.join("okrs")).await?;
        objectives.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(objectives)
    }

    async fn save_kpi(&mut self, kpi: &Kpi) -> Result<()> {
        check("kpis", &kpi.id.to_string(), kpi.validate())?;
        self.write_record("kpis", &kpi.id.to_string(), kpi).await
    }

    async fn load_kpi(&self, id: KpiId) -> Result<Option<Kpi>> {
        read_json(&self.record_path("kpis", &id.to_string())).await
    }

    async fn list_kpis(&self) -> Result<Vec<Kpi>> {
        let mut kpis: Vec<Kpi> = list_dir(&self.root.join("kpis")).await?;
        kpis.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(kpis)
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        // Records are written on save; nothing is buffered.
        debug!("Commit: {}", message);
        Ok(())
    }
}

fn check(kind: &str, id: &str, result: pacer_core::ValidationResult) -> Result<()> {
    if let Err(e) = &result {
        warn!("Rejected {}/{}: {}", kind, id, e);
    }
    Ok(result?)
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping unreadable record {}: {}", entry.path().display(), e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pacer_core::{KeyResult, TaskStatus};

    async fn storage() -> (tempfile::TempDir, JsonStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_project_roundtrip() {
        let (_dir, mut storage) = storage().await;
        let project = Project::new("Website");

        storage.save_project(&project).await.unwrap();
        let loaded = storage.load_project(project.id).await.unwrap().unwrap();

        assert_eq!(loaded.name, "Website");
        assert_eq!(storage.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let (_dir, storage) = storage().await;
        assert!(storage.load_task(TaskId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_version_bumps_on_each_save() {
        let (_dir, mut storage) = storage().await;
        let mut project = Project::new("Website");
        storage.save_project(&project).await.unwrap();
        project.progress = 50;
        storage.save_project(&project).await.unwrap();

        let version = storage.version("projects", &project.id.to_string()).await.unwrap();
        assert_eq!(version, 2);
    }

    #[tokio::test]
    async fn test_delete_task_removes_record_and_meta() {
        let (_dir, mut storage) = storage().await;
        let task = Task::new(ProjectId::new(), "Draft copy");
        storage.save_task(&task).await.unwrap();
        let id = task.id.to_string();
        assert_eq!(storage.version("tasks", &id).await.unwrap(), 1);

        storage.delete_task(task.id).await.unwrap();
        assert!(storage.load_task(task.id).await.unwrap().is_none());
        assert_eq!(storage.version("tasks", &id).await.unwrap(), 0);

        // Deleting again is a no-op.
        storage.delete_task(task.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_tasks_filters() {
        let (_dir, mut storage) = storage().await;
        let a = Project::new("A");
        let b = Project::new("B");
        storage.save_task(&Task::new(a.id, "a1").with_status(TaskStatus::Completed)).await.unwrap();
        storage.save_task(&Task::new(a.id, "a2")).await.unwrap();
        storage.save_task(&Task::new(b.id, "b1")).await.unwrap();

        let for_a = storage.list_tasks(&TaskFilter::for_project(a.id)).await.unwrap();
        assert_eq!(for_a.len(), 2);

        let done = storage
            .list_tasks(&TaskFilter {
                project_id: Some(a.id),
                status: Some(vec![TaskStatus::Completed]),
            })
            .await
            .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "a1");
    }

    #[tokio::test]
    async fn test_invalid_record_rejected() {
        let (_dir, mut storage) = storage().await;
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let mut okr = Objective::new("Grow", start);
        okr.key_results.push(KeyResult::new("Signups", 0.0, 100.0).with_weight(0));

        let err = storage.save_objective(&okr).await.unwrap_err();
        assert!(matches!(err, crate::StorageError::Validation(_)));
        assert!(storage.load_objective(okr.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let (_dir, mut storage) = storage().await;
        let project = Project::new("Website");
        storage.save_project(&project).await.unwrap();
        let task = Task::new(project.id, "Landing page");
        storage.save_task(&task).await.unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let mut kpi = Kpi::new("Visitors", 0.0, 1000.0, start);
        kpi.project_id = Some(project.id);
        storage.save_kpi(&kpi).await.unwrap();

        storage.delete_project(project.id).await.unwrap();

        assert!(storage.load_project(project.id).await.unwrap().is_none());
        assert!(storage.load_task(task.id).await.unwrap().is_none());
        let kpi = storage.load_kpi(kpi.id).await.unwrap().unwrap();
        assert_eq!(kpi.project_id, None);
    }
}
