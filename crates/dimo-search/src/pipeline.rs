//! The nearby-store search pipeline: filter, rank, diversify.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dimo_core::Coordinate;

use crate::diversity::diversify;
use crate::error::SearchError;
use crate::filter::filter_catalog;
use crate::geo::distance_km;
use crate::ranker::rank_brands;
use crate::snapshot::CatalogSnapshot;
use crate::sources::{BrandDirectory, PersonalizedRanker, StoreCatalog};
use crate::types::{ScoredCandidate, SearchRequest, SearchResult};

/// Search entry point, holding the collaborators shared by every request.
#[derive(Clone)]
pub struct SearchEngine {
    catalog: Arc<dyn StoreCatalog>,
    brands: Arc<dyn BrandDirectory>,
    ranker: Arc<dyn PersonalizedRanker>,
    ranking_timeout: Duration,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("ranking_timeout", &self.ranking_timeout)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn StoreCatalog>,
        brands: Arc<dyn BrandDirectory>,
        ranker: Arc<dyn PersonalizedRanker>,
        ranking_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            brands,
            ranker,
            ranking_timeout,
        }
    }

    /// Stores within `request.radius_km` of `request.origin`, ordered for
    /// display.
    ///
    /// Ranking failures never fail the search: they switch to the popularity
    /// fallback, reported in [`SearchResult::ranking_source`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidOrigin`] or [`SearchError::InvalidRadius`]
    /// for malformed requests.
    pub async fn search(
        &self,
        snapshot: &CatalogSnapshot,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchError> {
        let started = Instant::now();

        let filtered = filter_catalog(
            &snapshot.stores,
            request.origin,
            request.radius_km,
            self.brands.as_ref(),
        )
        .await?;

        let ranking = rank_brands(
            request.user_id,
            &filtered.brand_ids,
            self.ranker.as_ref(),
            self.catalog.as_ref(),
            self.ranking_timeout,
        )
        .await;

        let mut candidates = filtered.candidates;
        for candidate in &mut candidates {
            candidate.rank = ranking.ranks.rank_of(candidate.brand_id);
        }

        let stores = diversify(candidates);
        let elapsed = started.elapsed();

        tracing::info!(
            user_id = request.user_id,
            radius_km = request.radius_km,
            results = stores.len(),
            rejected = filtered.rejected,
            ranking = %ranking.source,
            elapsed_ms = elapsed.as_millis(),
            "nearby search complete"
        );

        Ok(SearchResult {
            stores,
            ranking_source: ranking.source,
            rejected: filtered.rejected,
            elapsed,
        })
    }

    /// One store by id with its distance from `origin`. The store carries
    /// no rank.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidOrigin`] for a malformed origin and
    /// [`SearchError::Lookup`] if the catalog cannot be read.
    pub async fn store_detail(
        &self,
        store_id: i64,
        origin: Coordinate,
    ) -> Result<Option<ScoredCandidate>, SearchError> {
        if Coordinate::new(origin.latitude, origin.longitude).is_err() {
            return Err(SearchError::InvalidOrigin {
                latitude: origin.latitude,
                longitude: origin.longitude,
            });
        }

        let Some(store) = self
            .catalog
            .store_by_id(store_id)
            .await
            .map_err(SearchError::Lookup)?
        else {
            return Ok(None);
        };

        let brand_id = match self.brands.brand_by_name(&store.brand_name).await {
            Ok(brand) => brand.map(|b| b.id),
            Err(e) => {
                tracing::warn!(store_id, error = %e, "brand lookup failed for store detail");
                None
            }
        };

        let distance = distance_km(origin, store.coordinate);
        Ok(Some(ScoredCandidate::from_store(&store, brand_id, distance)))
    }
}
