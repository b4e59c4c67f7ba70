use std::collections::HashMap;

use async_trait::async_trait;
use gatehouse_application::PersistenceStore;
use gatehouse_core::AppResult;
use serde_json::Value;
use tokio::sync::RwLock;

/// Process-local persistence; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPersistenceStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryPersistenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryPersistenceStore {
    async fn load(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> AppResult<()> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
