//! Collaborator seams for the search pipeline.
//!
//! Production implementations wrap Postgres and the ranking service; tests
//! use in-memory fakes.

use async_trait::async_trait;
use dimo_core::{BrandRecord, StoreRecord};

use crate::error::SourceError;

/// Read access to the store catalog.
#[async_trait]
pub trait StoreCatalog: Send + Sync {
    /// Every store in the catalog, in a stable order.
    async fn all_stores(&self) -> Result<Vec<StoreRecord>, SourceError>;

    async fn store_by_id(&self, id: i64) -> Result<Option<StoreRecord>, SourceError>;

    /// Number of catalog stores carrying the brand. Used as its popularity.
    async fn count_stores_by_brand(&self, brand_id: i64) -> Result<i64, SourceError>;
}

/// Resolves brand names on store records to brand identifiers.
#[async_trait]
pub trait BrandDirectory: Send + Sync {
    async fn brand_by_name(&self, name: &str) -> Result<Option<BrandRecord>, SourceError>;
}

/// The personalized ranking service.
#[async_trait]
pub trait PersonalizedRanker: Send + Sync {
    /// Returns `brand_ids` reordered for `user_id`, most relevant first.
    async fn rank_brands_for_user(
        &self,
        user_id: i64,
        brand_ids: &[i64],
    ) -> Result<Vec<i64>, SourceError>;
}

/// Ranker used when no ranking service is configured. Every call fails, so
/// every search takes the popularity path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRanker;

#[async_trait]
impl PersonalizedRanker for DisabledRanker {
    async fn rank_brands_for_user(
        &self,
        _user_id: i64,
        _brand_ids: &[i64],
    ) -> Result<Vec<i64>, SourceError> {
        Err(SourceError::Unconfigured("ranking service"))
    }
}
