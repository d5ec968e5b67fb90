// View service - Use cases for the view lifecycle
use crate::application::error::ServiceResult;
use crate::application::view_repository::ViewRepository;
use crate::domain::view::{View, ViewId};
use std::sync::Arc;

#[derive(Clone)]
pub struct ViewService {
    repository: Arc<dyn ViewRepository>,
}

impl ViewService {
    pub fn new(repository: Arc<dyn ViewRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_view(&self, name: &str) -> ServiceResult<View> {
        let view = View::new(name)?;
        self.repository.create(&view).await?;
        tracing::info!("Created view {} ({})", view.name, view.id);
        Ok(view)
    }

    /// All views, most recently updated first
    pub async fn list_views(&self) -> ServiceResult<Vec<View>> {
        let mut views = self.repository.get_all().await?;
        views.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(views)
    }

    pub async fn get_view(&self, id: &ViewId) -> ServiceResult<View> {
        Ok(self.repository.get(id).await?)
    }

    pub async fn rename_view(&self, id: &ViewId, name: &str) -> ServiceResult<View> {
        let mut view = self.repository.get(id).await?;
        view.rename(name)?;
        self.repository.put(&view).await?;
        Ok(view)
    }

    /// Persist `view` with a fresh `updated_at`. The caller's copy is only
    /// replaced once the store accepts it.
    pub async fn save_view(&self, view: &mut View) -> ServiceResult<()> {
        let mut updated = view.clone();
        updated.touch();
        self.repository.put(&updated).await?;
        *view = updated;
        Ok(())
    }

    pub async fn delete_view(&self, id: &ViewId) -> ServiceResult<()> {
        self.repository.delete(id).await?;
        tracing::info!("Deleted view {}", id);
        Ok(())
    }
}
