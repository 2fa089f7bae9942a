//! In-memory collection store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Collection, CollectionStore, Documents};
use crate::error::{AppError, AppResult};

/// Collections held in process memory; lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Documents>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::Internal("Memory store lock poisoned".to_string())
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn load_collection(&self, collection: Collection) -> AppResult<Documents> {
        let guard = self.collections.read().map_err(|_| poisoned())?;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn save_collection(&self, collection: Collection, documents: Documents) -> AppResult<()> {
        let mut guard = self.collections.write().map_err(|_| poisoned())?;
        guard.insert(collection, documents);
        Ok(())
    }

    async fn save_many(&self, batch: Vec<(Collection, Documents)>) -> AppResult<()> {
        let mut guard = self.collections.write().map_err(|_| poisoned())?;
        for (collection, documents) in batch {
            guard.insert(collection, documents);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_collection_loads_empty() {
        let store = MemoryStore::new();
        assert!(store.load_collection(Collection::Teams).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let store = MemoryStore::new();
        store
            .save_collection(Collection::Teams, vec![json!({"id": "t1"}), json!({"id": "t2"})])
            .await
            .unwrap();
        store
            .save_collection(Collection::Teams, vec![json!({"id": "t3"})])
            .await
            .unwrap();
        let docs = store.load_collection(Collection::Teams).await.unwrap();
        assert_eq!(docs, vec![json!({"id": "t3"})]);
    }
}
