//! PostgreSQL collection store: one JSONB document array per collection row

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, Pool, Postgres};

use super::{Collection, CollectionStore, Documents};
use crate::{config::StorageConfig, error::AppResult};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect and run migrations
    pub async fn connect(config: &StorageConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.database_url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }
}

const UPSERT: &str = r#"
    INSERT INTO collections (name, documents, modif_date)
    VALUES ($1, $2, NOW())
    ON CONFLICT (name) DO UPDATE
    SET documents = EXCLUDED.documents, modif_date = NOW()
"#;

#[async_trait]
impl CollectionStore for PgStore {
    async fn load_collection(&self, collection: Collection) -> AppResult<Documents> {
        let row: Option<Json<Documents>> =
            sqlx::query_scalar("SELECT documents FROM collections WHERE name = $1")
                .bind(collection.name())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|Json(docs)| docs).unwrap_or_default())
    }

    async fn save_collection(&self, collection: Collection, documents: Documents) -> AppResult<()> {
        sqlx::query(UPSERT)
            .bind(collection.name())
            .bind(Json(documents))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_many(&self, batch: Vec<(Collection, Documents)>) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        for (collection, documents) in batch {
            sqlx::query(UPSERT)
                .bind(collection.name())
                .bind(Json(documents))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
