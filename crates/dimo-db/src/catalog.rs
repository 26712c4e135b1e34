//! Postgres-backed search collaborators.

use async_trait::async_trait;
use dimo_core::{BrandRecord, StoreRecord};
use dimo_search::{BrandDirectory, SourceError, StoreCatalog};
use sqlx::PgPool;

use crate::{brands, stores};

/// Store catalog and brand directory backed by the `stores` and `brands`
/// tables.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreCatalog for PgCatalog {
    async fn all_stores(&self) -> Result<Vec<StoreRecord>, SourceError> {
        let rows = stores::list_all_stores(&self.pool)
            .await
            .map_err(|e| SourceError::backend("list stores", e))?;
        Ok(rows.into_iter().map(StoreRecord::from).collect())
    }

    async fn store_by_id(&self, id: i64) -> Result<Option<StoreRecord>, SourceError> {
        let row = stores::get_store_by_id(&self.pool, id)
            .await
            .map_err(|e| SourceError::backend("get store", e))?;
        Ok(row.map(StoreRecord::from))
    }

    async fn count_stores_by_brand(&self, brand_id: i64) -> Result<i64, SourceError> {
        stores::count_stores_by_brand(&self.pool, brand_id)
            .await
            .map_err(|e| SourceError::backend("count stores by brand", e))
    }
}

#[async_trait]
impl BrandDirectory for PgCatalog {
    async fn brand_by_name(&self, name: &str) -> Result<Option<BrandRecord>, SourceError> {
        let row = brands::get_brand_by_name(&self.pool, name)
            .await
            .map_err(|e| SourceError::backend("get brand by name", e))?;
        Ok(row.map(BrandRecord::from))
    }
}
