// In-memory view repository, used for throwaway sessions and tests
use crate::application::view_repository::{StoreError, ViewRepository};
use crate::domain::view::{View, ViewId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryViewRepository {
    views: RwLock<HashMap<ViewId, View>>,
}

impl InMemoryViewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewRepository for InMemoryViewRepository {
    async fn create(&self, view: &View) -> Result<(), StoreError> {
        let mut views = self.views.write().await;
        if views.contains_key(&view.id) {
            return Err(StoreError::DuplicateKey(view.id));
        }
        views.insert(view.id, view.clone());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<View>, StoreError> {
        Ok(self.views.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &ViewId) -> Result<View, StoreError> {
        self.views
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    async fn put(&self, view: &View) -> Result<(), StoreError> {
        self.views.write().await.insert(view.id, view.clone());
        Ok(())
    }

    async fn delete(&self, id: &ViewId) -> Result<(), StoreError> {
        self.views.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let repo = InMemoryViewRepository::new();
        let view = View::new("Ops").unwrap();

        repo.create(&view).await.unwrap();
        assert!(matches!(
            repo.create(&view).await,
            Err(StoreError::DuplicateKey(id)) if id == view.id
        ));
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let repo = InMemoryViewRepository::new();
        let mut view = View::new("Ops").unwrap();
        repo.put(&view).await.unwrap();

        view.rename("Operations").unwrap();
        repo.put(&view).await.unwrap();

        assert_eq!(repo.get(&view.id).await.unwrap(), view);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let repo = InMemoryViewRepository::new();
        let view = View::new("Ops").unwrap();
        repo.create(&view).await.unwrap();

        repo.delete(&ViewId::new()).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap(), vec![view.clone()]);

        repo.delete(&view.id).await.unwrap();
        repo.delete(&view.id).await.unwrap();
        assert!(matches!(repo.get(&view.id).await, Err(StoreError::NotFound(_))));
    }
}
