//! Settings store with a cached value and an injected reload policy.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use pacer_core::Settings;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use super::Result;

/// When a cached settings value must be re-read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Load once, then serve the cache until `reload()` or `save()`
    Never,
    /// Re-read the file on every `get()`
    Always,
    /// Re-read once the cache is older than the given age
    After(Duration),
}

impl ReloadPolicy {
    /// Whether a value loaded at `loaded_at` is stale at `now`.
    pub fn is_stale(&self, loaded_at: Instant, now: Instant) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::After(ttl) => now.saturating_duration_since(loaded_at) >= *ttl,
        }
    }
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        Self::After(Duration::from_secs(3600))
    }
}

struct Cached {
    settings: Settings,
    loaded_at: Instant,
}

/// File-backed settings with defaults as fallback.
pub struct SettingsStore {
    path: PathBuf,
    policy: ReloadPolicy,
    cache: RwLock<Option<Cached>>,
}

impl SettingsStore {
    /// Create a store for `path`. Nothing is read until the first `get()`.
    pub fn new(path: impl AsRef<Path>, policy: ReloadPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy,
            cache: RwLock::new(None),
        }
    }

    /// Settings file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings, reloading when the policy says the cache is stale.
    pub async fn get(&self) -> Result<Settings> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if !self.policy.is_stale(cached.loaded_at, Instant::now()) {
                    return Ok(cached.settings.clone());
                }
            }
        }
        self.reload().await
    }

    /// Force a re-read of the settings file.
    ///
    /// A missing file yields defaults. A file that does not parse also
    /// yields defaults and logs a warning.
    pub async fn reload(&self) -> Result<Settings> {
        let settings = match fs::read_to_string(&self.path).await {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Ignoring unreadable settings file {}: {}", self.path.display(), e);
                    Settings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded settings from {}", self.path.display());
        self.store_cache(settings.clone()).await;
        Ok(settings)
    }

    /// Validate, persist and cache `settings`.
    pub async fn save(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&settings)?;
        fs::write(&self.path, json.as_bytes()).await?;
        self.store_cache(settings).await;
        Ok(())
    }

    /// Set one camelCase key and persist the result.
    pub async fn update(&self, key: &str, raw: &str) -> Result<Settings> {
        let mut settings = self.get().await?;
        settings.set(key, raw)?;
        self.save(settings.clone()).await?;
        Ok(settings)
    }

    async fn store_cache(&self, settings: Settings) {
        *self.cache.write().await = Some(Cached {
            settings,
            loaded_at: Instant::now(),
        });
    }
}
