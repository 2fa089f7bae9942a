//! JSON-file collection store: one `<collection>.json` array per collection

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Collection, CollectionStore, Documents};
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory
    pub async fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.name()))
    }

    fn staging_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", collection.name()))
    }

    async fn stage(&self, collection: Collection, documents: &Documents) -> AppResult<PathBuf> {
        let staging = self.staging_path(collection);
        let bytes = serde_json::to_vec_pretty(documents)?;
        tokio::fs::write(&staging, bytes).await?;
        Ok(staging)
    }
}

#[async_trait]
impl CollectionStore for FileStore {
    async fn load_collection(&self, collection: Collection) -> AppResult<Documents> {
        match tokio::fs::read(self.path(collection)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_collection(&self, collection: Collection, documents: Documents) -> AppResult<()> {
        let staging = self.stage(collection, &documents).await?;
        tokio::fs::rename(staging, self.path(collection)).await?;
        Ok(())
    }

    /// All files are staged before any is renamed into place, so a failed
    /// write leaves every collection at its previous content.
    async fn save_many(&self, batch: Vec<(Collection, Documents)>) -> AppResult<()> {
        let mut staged = Vec::with_capacity(batch.len());
        for (collection, documents) in &batch {
            match self.stage(*collection, documents).await {
                Ok(path) => staged.push((*collection, path)),
                Err(e) => {
                    for (_, path) in staged {
                        let _ = tokio::fs::remove_file(path).await;
                    }
                    return Err(e);
                }
            }
        }
        for (collection, path) in staged {
            tokio::fs::rename(path, self.path(collection)).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        tokio::fs::metadata(&self.dir).await?;
        Ok(())
    }
}
