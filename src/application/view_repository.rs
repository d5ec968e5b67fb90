// Repository trait for view persistence
use crate::domain::view::{View, ViewId};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("view {0} not found")]
    NotFound(ViewId),

    #[error("view {0} already exists")]
    DuplicateKey(ViewId),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("view record is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store of views keyed by id.
///
/// Every mutation is durable once the returned future resolves.
#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// Insert a new view, failing if the id is taken
    async fn create(&self, view: &View) -> Result<(), StoreError>;

    /// All stored views, in no particular order
    async fn get_all(&self) -> Result<Vec<View>, StoreError>;

    async fn get(&self, id: &ViewId) -> Result<View, StoreError>;

    /// Insert or replace
    async fn put(&self, view: &View) -> Result<(), StoreError>;

    /// Remove a view; removing a missing id is not an error
    async fn delete(&self, id: &ViewId) -> Result<(), StoreError>;
}
