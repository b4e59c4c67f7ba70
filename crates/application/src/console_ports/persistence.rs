use async_trait::async_trait;
use gatehouse_core::AppResult;
use serde_json::Value;

/// Key-value port persisting derived caches and the session across restarts.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Loads the value stored under `key`.
    async fn load(&self, key: &str) -> AppResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: Value) -> AppResult<()>;

    /// Removes the value stored under `key`; missing keys are not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
