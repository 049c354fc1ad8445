//! Persistence for the shared [`Settings`].
//!
//! Writes are partial: a [`SettingsPatch`] is merged over whatever is stored
//! and the merged value is returned. Stores never validate the band.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use autovolume_core::{Settings, SettingsPatch};

use crate::error::StoreError;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Settings, StoreError>;
    async fn save(&self, patch: &SettingsPatch) -> Result<Settings, StoreError>;
}

/// Process-local store, starting from defaults unless seeded.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    pub fn current(&self) -> Settings {
        *self.settings.lock()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        Ok(self.current())
    }

    async fn save(&self, patch: &SettingsPatch) -> Result<Settings, StoreError> {
        let mut settings = self.settings.lock();
        *settings = settings.merged(patch);
        Ok(*settings)
    }
}

/// Settings kept as `{"enabled", "minVolume", "maxVolume"}` JSON in one file.
///
/// A missing file reads as defaults; missing fields read as their defaults.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        let path = self.path.clone();
        run_blocking(move || read_settings(&path)).await
    }

    async fn save(&self, patch: &SettingsPatch) -> Result<Settings, StoreError> {
        let path = self.path.clone();
        let patch = *patch;
        run_blocking(move || {
            let merged = read_settings(&path)?.merged(&patch);
            write_settings(&path, &merged)?;
            Ok(merged)
        })
        .await
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(err) => Err(StoreError::Task(err.to_string())),
    }
}

fn read_settings(path: &Path) -> Result<Settings, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        },
    };
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_settings(path: &Path, settings: &Settings) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let bytes = serde_json::to_vec_pretty(settings).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, bytes).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use autovolume_core::{Settings, SettingsPatch};

    use super::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
    use crate::error::StoreError;

    #[tokio::test(flavor = "multi_thread")]
    async fn memory_store_merges_partial_writes() {
        let store = MemorySettingsStore::default();
        let saved = store.save(&SettingsPatch::min_volume(35)).await.unwrap();
        assert_eq!(saved, Settings::with_band(35, 80));
        let saved = store.save(&SettingsPatch::enabled(false)).await.unwrap();
        assert!(!saved.enabled);
        assert_eq!(store.load().await.unwrap().min_volume, 35);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_file_reads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().await.unwrap(), Settings::default());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = JsonFileSettingsStore::new(&path);
        store.save(&SettingsPatch::max_volume(65)).await.unwrap();
        store.save(&SettingsPatch::enabled(false)).await.unwrap();

        let reopened = JsonFileSettingsStore::new(&path);
        let settings = reopened.load().await.unwrap();
        assert_eq!(settings.max_volume, 65);
        assert_eq!(settings.min_volume, 20);
        assert!(!settings.enabled);

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["maxVolume"], 65);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"minVolume": 10}"#).unwrap();
        let settings = JsonFileSettingsStore::new(&path).load().await.unwrap();
        assert_eq!(settings, Settings::with_band(10, 80));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        let err = JsonFileSettingsStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
