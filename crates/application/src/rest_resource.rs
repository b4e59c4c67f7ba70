use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{ConsoleRecord, resolve_path};
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::console_ports::{CollectionSource, CreateRecord, Draft, Transport, UpdateRecord};

/// Returns the draft as the JSON object sent to the backend.
#[must_use]
pub fn draft_to_json(draft: &Draft) -> Value {
    Value::Object(
        draft
            .iter()
            .map(|(key, value)| {
                let value = serde_json::to_value(value).unwrap_or(Value::Null);
                (key.clone(), value)
            })
            .collect(),
    )
}

/// Returns whether every draft value equals the original's value at its key.
///
/// A blank draft value matches an absent or null original value.
#[must_use]
pub fn draft_matches<T>(draft: &Draft, original: &T) -> bool
where
    T: Serialize,
{
    let Ok(original) = serde_json::to_value(original) else {
        return false;
    };

    draft
        .iter()
        .all(|(key, value)| match resolve_path(&original, key) {
            None | Some(Value::Null) => value.is_blank(),
            Some(current) => serde_json::to_value(value).is_ok_and(|value| *current == value),
        })
}

/// Typed binding of one backend collection.
///
/// Creates POST to the collection and updates PUT to `collection/{id}`.
pub struct RestResource<T> {
    transport: Arc<dyn Transport>,
    collection_url: String,
    record: PhantomData<fn() -> T>,
}

impl<T> Clone for RestResource<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            collection_url: self.collection_url.clone(),
            record: PhantomData,
        }
    }
}

impl<T> RestResource<T>
where
    T: DeserializeOwned,
{
    /// Binds `collection` under `base_url`; both gain a trailing slash.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, collection: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let collection = collection.trim_matches('/');
        Self {
            transport,
            collection_url: format!("{base}/{collection}/"),
            record: PhantomData,
        }
    }

    /// Returns the collection URL.
    #[must_use]
    pub fn collection_url(&self) -> &str {
        self.collection_url.as_str()
    }

    /// Returns the URL of one record.
    #[must_use]
    pub fn record_url(&self, id: &str) -> String {
        format!("{}{id}", self.collection_url)
    }

    /// Sends `body` as a PUT to one record.
    pub async fn put(&self, id: &str, body: Value) -> AppResult<T> {
        let url = self.record_url(id);
        let response = self.transport.request(&url, Method::PUT, Some(body)).await?;
        decode(&url, response)
    }
}

fn decode<R>(url: &str, response: Value) -> AppResult<R>
where
    R: DeserializeOwned,
{
    serde_json::from_value(response).map_err(|error| {
        AppError::RemoteOperationFailed(format!("unexpected response from {url}: {error}"))
    })
}

#[async_trait]
impl<T> CollectionSource<T> for RestResource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_all(&self) -> AppResult<Vec<T>> {
        let response = self
            .transport
            .request(&self.collection_url, Method::GET, None)
            .await?;
        decode(&self.collection_url, response)
    }
}

#[async_trait]
impl<T> CreateRecord<T> for RestResource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn create(&self, draft: &Draft) -> AppResult<T> {
        let response = self
            .transport
            .request(&self.collection_url, Method::POST, Some(draft_to_json(draft)))
            .await?;
        info!(url = %self.collection_url, "record created");
        decode(&self.collection_url, response)
    }
}

#[async_trait]
impl<T> UpdateRecord<T> for RestResource<T>
where
    T: ConsoleRecord + Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn update(&self, draft: &Draft, original: &T) -> AppResult<T> {
        if draft_matches(draft, original) {
            debug!(url = %self.collection_url, "edit draft unchanged; skipping update");
            return Ok(original.clone());
        }

        let id = original.record_id().ok_or_else(|| {
            AppError::Validation("cannot update a record without an id".to_owned())
        })?;

        let stored = self.put(id, draft_to_json(draft)).await?;
        info!(url = %self.record_url(id), "record updated");
        Ok(stored)
    }
}
