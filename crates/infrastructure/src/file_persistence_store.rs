use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gatehouse_application::PersistenceStore;
use gatehouse_core::{AppError, AppResult};
use serde_json::Value;
use tracing::debug;

/// Persistence backed by one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FilePersistenceStore {
    directory: PathBuf,
}

impl FilePersistenceStore {
    /// Creates a store rooted at `directory`; it is created on first save.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.directory.as_path()
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || "-_".contains(character));
        if !valid {
            return Err(AppError::Validation(format!(
                "persistence key '{key}' must use only letters, digits, '-' and '_'"
            )));
        }

        Ok(self.directory.join(format!("{key}.json")))
    }
}

#[async_trait]
impl PersistenceStore for FilePersistenceStore {
    async fn load(&self, key: &str) -> AppResult<Option<Value>> {
        let path = self.path_for(key)?;
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read '{}': {error}",
                    path.display()
                )));
            }
        };

        serde_json::from_slice(&raw).map(Some).map_err(|error| {
            AppError::Internal(format!("failed to decode '{}': {error}", path.display()))
        })
    }

    async fn save(&self, key: &str, value: Value) -> AppResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to create '{}': {error}",
                    self.directory.display()
                ))
            })?;

        let encoded = serde_json::to_vec_pretty(&value)
            .map_err(|error| AppError::Internal(format!("failed to encode '{key}': {error}")))?;
        tokio::fs::write(&path, encoded).await.map_err(|error| {
            AppError::Internal(format!("failed to write '{}': {error}", path.display()))
        })?;

        debug!(key, path = %path.display(), "persisted value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove '{}': {error}",
                path.display()
            ))),
        }
    }
}
