use async_trait::async_trait;
use gatehouse_core::AppResult;
use gatehouse_domain::FieldValues;

/// In-progress record keyed by column key.
pub type Draft = FieldValues;

/// Port listing every record of one collection.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync
where
    T: Send,
{
    /// Fetches the full collection.
    async fn fetch_all(&self) -> AppResult<Vec<T>>;
}

/// Port persisting a newly created record.
#[async_trait]
pub trait CreateRecord<T>: Send + Sync
where
    T: Send,
{
    /// Creates a record from a draft and returns the stored record.
    async fn create(&self, draft: &Draft) -> AppResult<T>;
}

/// Port persisting an edited record.
#[async_trait]
pub trait UpdateRecord<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Applies a draft over `original` and returns the stored record.
    async fn update(&self, draft: &Draft, original: &T) -> AppResult<T>;
}
