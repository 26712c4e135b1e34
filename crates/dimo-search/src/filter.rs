//! Radius filter over a catalog snapshot.

use std::collections::{HashMap, HashSet};

use dimo_core::{Coordinate, StoreRecord};

use crate::error::SearchError;
use crate::geo::distance_km;
use crate::sources::BrandDirectory;
use crate::types::ScoredCandidate;

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Stores within the radius, in snapshot order.
    pub candidates: Vec<ScoredCandidate>,
    /// Distinct resolved brand ids of the candidates, in first-seen order.
    pub brand_ids: Vec<i64>,
    /// Stores outside the radius (or with coordinates that give no distance).
    pub rejected: usize,
}

/// Keep the stores within `radius_km` of `origin` (inclusive).
///
/// Each admitted store's brand name is resolved through `brands`, once per
/// distinct name. A store whose brand cannot be resolved is still admitted
/// but contributes nothing to `brand_ids`, so it stays unranked.
///
/// # Errors
///
/// Returns [`SearchError::InvalidOrigin`] or [`SearchError::InvalidRadius`]
/// for non-finite or out-of-range input. Collaborator failures never error.
pub async fn filter_catalog(
    stores: &[StoreRecord],
    origin: Coordinate,
    radius_km: f64,
    brands: &dyn BrandDirectory,
) -> Result<FilterOutcome, SearchError> {
    if Coordinate::new(origin.latitude, origin.longitude).is_err() {
        return Err(SearchError::InvalidOrigin {
            latitude: origin.latitude,
            longitude: origin.longitude,
        });
    }
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(SearchError::InvalidRadius(radius_km));
    }

    let mut outcome = FilterOutcome::default();
    let mut resolved: HashMap<&str, Option<i64>> = HashMap::new();
    let mut seen_brands: HashSet<i64> = HashSet::new();

    for store in stores {
        let distance = distance_km(origin, store.coordinate);
        if distance.is_nan() || distance > radius_km {
            outcome.rejected += 1;
            continue;
        }

        let brand_id = if let Some(id) = resolved.get(store.brand_name.as_str()).copied() {
            id
        } else {
            let id = resolve_brand(brands, &store.brand_name).await;
            resolved.insert(store.brand_name.as_str(), id);
            id
        };

        if let Some(id) = brand_id {
            if seen_brands.insert(id) {
                outcome.brand_ids.push(id);
            }
        }

        outcome
            .candidates
            .push(ScoredCandidate::from_store(store, brand_id, distance));
    }

    tracing::debug!(
        admitted = outcome.candidates.len(),
        rejected = outcome.rejected,
        brands = outcome.brand_ids.len(),
        radius_km,
        "catalog filtered"
    );

    Ok(outcome)
}

async fn resolve_brand(brands: &dyn BrandDirectory, name: &str) -> Option<i64> {
    match brands.brand_by_name(name).await {
        Ok(Some(brand)) => Some(brand.id),
        Ok(None) => {
            tracing::debug!(brand = name, "brand not found; store stays unranked");
            None
        }
        Err(e) => {
            tracing::warn!(brand = name, error = %e, "brand lookup failed; store stays unranked");
            None
        }
    }
}
