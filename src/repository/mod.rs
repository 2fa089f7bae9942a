//! Record store: four whole-collection document sets behind a narrow
//! load/save interface, plus typed access for the services.

pub mod equipment;
pub mod file;
pub mod memory;
pub mod postgres;
pub mod requests;
pub mod seed;
pub mod teams;
pub mod unit_of_work;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{
    config::{StorageBackend, StorageConfig},
    error::{AppError, AppResult},
    models::{Equipment, MaintenanceRequest, Team, User},
};

pub use unit_of_work::UnitOfWork;

/// The four persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Teams,
    Equipment,
    Requests,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Teams,
        Collection::Equipment,
        Collection::Requests,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Teams => "teams",
            Collection::Equipment => "equipment",
            Collection::Requests => "requests",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw documents of one collection
pub type Documents = Vec<serde_json::Value>;

/// Persistence backend. Each collection is read and written as a whole.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn load_collection(&self, collection: Collection) -> AppResult<Documents>;

    async fn save_collection(&self, collection: Collection, documents: Documents) -> AppResult<()>;

    /// Save several collections so that either all or none become visible.
    /// Backends without native atomicity fall back to sequential saves.
    async fn save_many(&self, batch: Vec<(Collection, Documents)>) -> AppResult<()> {
        for (collection, documents) in batch {
            self.save_collection(collection, documents).await?;
        }
        Ok(())
    }

    /// Backend reachability, used by the readiness probe
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// A record type stored in one of the collections
pub trait Record: Serialize + DeserializeOwned + Clone + Send {
    const COLLECTION: Collection;
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;
    const LABEL: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Team {
    const COLLECTION: Collection = Collection::Teams;
    const LABEL: &'static str = "Team";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Equipment {
    const COLLECTION: Collection = Collection::Equipment;
    const LABEL: &'static str = "Equipment";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for MaintenanceRequest {
    const COLLECTION: Collection = Collection::Requests;
    const LABEL: &'static str = "Request";

    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn decode<T: Record>(documents: Documents) -> AppResult<Vec<T>> {
    documents
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(AppError::from))
        .collect()
}

pub(crate) fn encode<T: Record>(records: &[T]) -> AppResult<Documents> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(AppError::from))
        .collect()
}

pub(crate) fn not_found<T: Record>(id: &str) -> AppError {
    AppError::NotFound(format!("{} {} not found", T::LABEL, id))
}

/// Main repository: typed access over a [`CollectionStore`]
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn CollectionStore>,
    /// Serializes read-modify-write cycles within this process
    write_lock: Arc<Mutex<()>>,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryStore::new()))
    }

    /// Build the store selected by configuration
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let store: Arc<dyn CollectionStore> = match config.backend {
            StorageBackend::Memory => Arc::new(memory::MemoryStore::new()),
            StorageBackend::File => Arc::new(file::FileStore::open(&config.data_dir).await?),
            StorageBackend::Postgres => Arc::new(postgres::PgStore::connect(config).await?),
        };
        tracing::info!(backend = ?config.backend, "Record store ready");
        Ok(Self::new(store))
    }

    /// Load every record of one collection
    pub async fn list<T: Record>(&self) -> AppResult<Vec<T>> {
        decode(self.store.load_collection(T::COLLECTION).await?)
    }

    /// Load one record by id
    pub async fn get<T: Record>(&self, id: &str) -> AppResult<T> {
        self.list::<T>()
            .await?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Run a read-modify-write cycle over all four collections.
    ///
    /// The closure sees a consistent snapshot taken under the write lock.
    /// Collections it touched are saved in one batch when it returns `Ok`;
    /// on `Err` nothing is written.
    pub async fn transact<R, F>(&self, work: F) -> AppResult<R>
    where
        F: FnOnce(&mut UnitOfWork) -> AppResult<R>,
    {
        let _guard = self.write_lock.lock().await;

        let mut uow = UnitOfWork::new(
            self.list::<User>().await?,
            self.list::<Team>().await?,
            self.list::<Equipment>().await?,
            self.list::<MaintenanceRequest>().await?,
        );

        let result = work(&mut uow)?;

        let batch = uow.into_batch()?;
        if !batch.is_empty() {
            self.store.save_many(batch).await?;
        }
        Ok(result)
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
