// File-backed view repository - one JSON record per view
use crate::application::view_repository::{StoreError, ViewRepository};
use crate::domain::view::{View, ViewId};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileViewRepository {
    root: PathBuf,
}

impl FileViewRepository {
    /// Open (and create if needed) the store directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        tracing::debug!("View store opened at {}", root.display());
        Ok(Self { root })
    }

    fn record_path(&self, id: &ViewId) -> PathBuf {
        self.root.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    fn temp_path(&self, id: &ViewId) -> PathBuf {
        self.root.join(format!("{}.{}.tmp", id, RECORD_EXTENSION))
    }

    async fn read_record(path: &Path) -> Result<View, StoreError> {
        let contents = fs::read(path).await?;
        Ok(serde_json::from_slice(&contents)?)
    }

    /// Write `view` to its temp file and fsync it. A failed write removes
    /// the temp file so no partial record is left behind.
    async fn stage(&self, view: &View) -> Result<PathBuf, StoreError> {
        let json = serde_json::to_vec_pretty(view)?;
        let temp = self.temp_path(&view.id);

        let written = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(&json).await?;
            file.sync_all().await
        }
        .await;

        match written {
            Ok(()) => Ok(temp),
            Err(e) => {
                Self::discard(&temp).await;
                Err(e.into())
            }
        }
    }

    async fn discard(temp: &Path) {
        match fs::remove_file(temp).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove temp file {}: {}", temp.display(), e),
        }
    }

    /// Flush directory entries so a link or rename survives a crash.
    async fn sync_root(&self) -> Result<(), StoreError> {
        if cfg!(unix) {
            fs::File::open(&self.root).await?.sync_all().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ViewRepository for FileViewRepository {
    async fn create(&self, view: &View) -> Result<(), StoreError> {
        let record = self.record_path(&view.id);
        if fs::try_exists(&record).await? {
            return Err(StoreError::DuplicateKey(view.id));
        }

        let temp = self.stage(view).await?;

        // Linking never replaces an existing record
        let linked = fs::hard_link(&temp, &record).await;
        Self::discard(&temp).await;
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::DuplicateKey(view.id));
            }
            Err(e) => return Err(e.into()),
        }

        self.sync_root().await?;
        tracing::debug!("Created view record {}", view.id);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<View>, StoreError> {
        let mut views = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            // Records are schemaless on disk; skip what no longer parses
            match Self::read_record(&path).await {
                Ok(view) => views.push(view),
                Err(e) => tracing::warn!("Skipping unreadable view record {}: {}", path.display(), e),
            }
        }

        Ok(views)
    }

    async fn get(&self, id: &ViewId) -> Result<View, StoreError> {
        match Self::read_record(&self.record_path(id)).await {
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(*id))
            }
            other => other,
        }
    }

    async fn put(&self, view: &View) -> Result<(), StoreError> {
        let temp = self.stage(view).await?;

        if let Err(e) = fs::rename(&temp, self.record_path(&view.id)).await {
            Self::discard(&temp).await;
            return Err(e.into());
        }

        self.sync_root().await?;
        tracing::debug!("Stored view record {}", view.id);
        Ok(())
    }

    async fn delete(&self, id: &ViewId) -> Result<(), StoreError> {
        match fs::remove_file(self.record_path(id)).await {
            Ok(()) => {
                tracing::debug!("Deleted view record {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
