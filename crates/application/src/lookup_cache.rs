use std::sync::Arc;

use gatehouse_domain::FieldOption;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::console_ports::{CollectionSource, Notice, Notifier, PersistenceStore};

struct LookupState<T> {
    records: Vec<T>,
    reload: bool,
}

/// Lazily populated collection cache with an explicit reload flag.
///
/// Fetch failures never surface as errors; the cache degrades to the last
/// in-memory value, then the persisted copy, then an empty list.
pub struct LookupCache<T> {
    name: String,
    source: Arc<dyn CollectionSource<T>>,
    store: Arc<dyn PersistenceStore>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<LookupState<T>>,
}

impl<T> LookupCache<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a cache; the first `get` always fetches.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn CollectionSource<T>>,
        store: Arc<dyn PersistenceStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            store,
            notifier,
            state: Mutex::new(LookupState {
                records: Vec::new(),
                reload: true,
            }),
        }
    }

    /// Returns the cache name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the persistence key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}-storage", self.name)
    }

    /// Returns cached records, fetching when flagged for reload or empty.
    pub async fn get(&self) -> Vec<T> {
        let mut state = self.state.lock().await;
        if !state.reload && !state.records.is_empty() {
            debug!(cache = %self.name, "lookup cache hit");
            return state.records.clone();
        }

        match self.source.fetch_all().await {
            Ok(records) => {
                self.persist(&records).await;
                state.records = records;
                state.reload = false;
                info!(cache = %self.name, count = state.records.len(), "lookup cache refreshed");
                state.records.clone()
            }
            Err(error) => {
                warn!(cache = %self.name, error = %error, "lookup cache fetch failed");
                self.notifier
                    .notify(
                        Notice::error(format!("could not load {}", self.name))
                            .with_id(format!("error-fetch-{}", self.name)),
                    )
                    .await;

                if state.records.is_empty() {
                    state.records = self.load_persisted().await;
                }
                state.records.clone()
            }
        }
    }

    /// Flags the cache for reload on the next `get`.
    pub async fn invalidate(&self) {
        self.state.lock().await.reload = true;
        debug!(cache = %self.name, "lookup cache invalidated");
    }

    /// Invalidates then reloads.
    pub async fn refresh(&self) -> Vec<T> {
        self.invalidate().await;
        self.get().await
    }

    /// Projects cached records into select options.
    pub async fn options<V, L>(&self, value_of: V, label_of: L) -> Vec<FieldOption>
    where
        V: Fn(&T) -> String,
        L: Fn(&T) -> String,
    {
        self.get()
            .await
            .iter()
            .map(|record| FieldOption::new(value_of(record), label_of(record)))
            .collect()
    }

    async fn persist(&self, records: &[T]) {
        let value = match serde_json::to_value(records) {
            Ok(value) => value,
            Err(error) => {
                warn!(cache = %self.name, error = %error, "failed to encode lookup cache");
                return;
            }
        };

        if let Err(error) = self.store.save(&self.storage_key(), value).await {
            warn!(cache = %self.name, error = %error, "failed to persist lookup cache");
        }
    }

    async fn load_persisted(&self) -> Vec<T> {
        match self.store.load(&self.storage_key()).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|error| {
                warn!(cache = %self.name, error = %error, "persisted lookup cache is unreadable");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(cache = %self.name, error = %error, "failed to load persisted lookup cache");
                Vec::new()
            }
        }
    }
}
