//! Read-only catalog snapshots shared across concurrent searches.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dimo_core::StoreRecord;
use tokio::sync::RwLock;

use crate::error::SearchError;
use crate::sources::StoreCatalog;

/// Every catalog store as of `loaded_at`. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub stores: Vec<StoreRecord>,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Load the full catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if the catalog cannot be read.
    pub async fn load(catalog: &dyn StoreCatalog) -> Result<Self, SearchError> {
        let stores = catalog.all_stores().await.map_err(SearchError::Snapshot)?;
        Ok(Self::from_stores(stores))
    }

    #[must_use]
    pub fn from_stores(stores: Vec<StoreRecord>) -> Self {
        Self {
            stores,
            loaded_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// Handle to the current snapshot.
///
/// Readers clone out an `Arc` and search against it without holding the
/// lock; a refresh swaps in a new snapshot without disturbing searches
/// already running against the old one.
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl SharedCatalog {
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub async fn current(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.inner.read().await)
    }

    pub async fn replace(&self, snapshot: CatalogSnapshot) {
        *self.inner.write().await = Arc::new(snapshot);
    }

    /// Reload from `catalog` and swap the result in. On failure the current
    /// snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if the catalog cannot be read.
    pub async fn refresh(&self, catalog: &dyn StoreCatalog) -> Result<usize, SearchError> {
        let snapshot = CatalogSnapshot::load(catalog).await?;
        let count = snapshot.len();
        self.replace(snapshot).await;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use dimo_core::{Coordinate, RatingAggregate};

    use super::*;
    use crate::error::SourceError;

    struct FixedCatalog(Option<Vec<StoreRecord>>);

    #[async_trait]
    impl StoreCatalog for FixedCatalog {
        async fn all_stores(&self) -> Result<Vec<StoreRecord>, SourceError> {
            self.0
                .clone()
                .ok_or(SourceError::Unconfigured("catalog"))
        }

        async fn store_by_id(&self, _id: i64) -> Result<Option<StoreRecord>, SourceError> {
            Ok(None)
        }

        async fn count_stores_by_brand(&self, _brand_id: i64) -> Result<i64, SourceError> {
            Ok(0)
        }
    }

    fn store(id: i64) -> StoreRecord {
        StoreRecord {
            id,
            brand_name: "A".to_string(),
            sub_name: String::new(),
            category: String::new(),
            address: String::new(),
            coordinate: Coordinate {
                latitude: 1.0,
                longitude: 2.0,
            },
            rating: RatingAggregate::default(),
        }
    }

    #[tokio::test]
    async fn refresh_swaps_snapshot_but_keeps_old_handles_valid() {
        let shared = SharedCatalog::new(CatalogSnapshot::from_stores(vec![store(1)]));
        let before = shared.current().await;

        let count = shared
            .refresh(&FixedCatalog(Some(vec![store(1), store(2)])))
            .await
            .expect("refresh");

        assert_eq!(count, 2);
        assert_eq!(before.len(), 1);
        assert_eq!(shared.current().await.len(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_current_snapshot() {
        let shared = SharedCatalog::new(CatalogSnapshot::from_stores(vec![store(7)]));

        let err = shared.refresh(&FixedCatalog(None)).await.unwrap_err();

        assert!(matches!(err, SearchError::Snapshot(_)));
        let current = shared.current().await;
        assert_eq!(current.stores[0].id, 7);
    }
}
