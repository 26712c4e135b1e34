//! Brand ranking: personalized ranking service first, catalog popularity as
//! the fallback.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::future::join_all;

use crate::error::SourceError;
use crate::sources::{PersonalizedRanker, StoreCatalog};
use crate::types::RankingSource;

/// Brand id → 1-based rank (lower is more relevant).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandRankMap {
    ranks: HashMap<i64, u32>,
}

impl BrandRankMap {
    /// Position `i` in `ordering` gets rank `i + 1`. Repeated ids keep their
    /// first position.
    #[must_use]
    pub fn from_ordering(ordering: &[i64]) -> Self {
        let mut ranks = HashMap::with_capacity(ordering.len());
        let mut next: u32 = 1;
        for &brand_id in ordering {
            if let std::collections::hash_map::Entry::Vacant(slot) = ranks.entry(brand_id) {
                slot.insert(next);
                next = next.saturating_add(1);
            }
        }
        Self { ranks }
    }

    /// Rank of `brand_id`, or `0` (unranked) when the brand is unknown or
    /// has no entry.
    #[must_use]
    pub fn rank_of(&self, brand_id: Option<i64>) -> u32 {
        brand_id
            .and_then(|id| self.ranks.get(&id).copied())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Brand ids ordered by rank, best first.
    #[must_use]
    pub fn ordering(&self) -> Vec<i64> {
        let mut pairs: Vec<(i64, u32)> = self.ranks.iter().map(|(&id, &r)| (id, r)).collect();
        pairs.sort_by_key(|&(_, rank)| rank);
        pairs.into_iter().map(|(id, _)| id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOutcome {
    pub ranks: BrandRankMap,
    pub source: RankingSource,
}

/// Rank `brand_ids` for `user_id`.
///
/// The ranking service is called once, bounded by `timeout`. Its order is
/// used when it names at least one of `brand_ids`; anything else (error,
/// timeout, empty or unusable answer) falls back to ordering by descending
/// catalog store count, ties kept in `brand_ids` order. Never fails.
pub async fn rank_brands(
    user_id: i64,
    brand_ids: &[i64],
    ranker: &dyn PersonalizedRanker,
    catalog: &dyn StoreCatalog,
    timeout: Duration,
) -> RankOutcome {
    let brand_ids = dedup_in_order(brand_ids);

    if brand_ids.is_empty() {
        return RankOutcome {
            ranks: BrandRankMap::default(),
            source: RankingSource::Popularity,
        };
    }

    if let Some(order) = personalized_order(user_id, &brand_ids, ranker, timeout).await {
        return RankOutcome {
            ranks: BrandRankMap::from_ordering(&order),
            source: RankingSource::Personalized,
        };
    }

    let order = popularity_order(&brand_ids, catalog).await;
    RankOutcome {
        ranks: BrandRankMap::from_ordering(&order),
        source: RankingSource::Popularity,
    }
}

async fn personalized_order(
    user_id: i64,
    brand_ids: &[i64],
    ranker: &dyn PersonalizedRanker,
    timeout: Duration,
) -> Option<Vec<i64>> {
    let result = match tokio::time::timeout(timeout, ranker.rank_brands_for_user(user_id, brand_ids))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout("ranking service", timeout.as_millis())),
    };

    match result {
        Ok(order) => {
            let normalized = normalize_personalized(&order, brand_ids);
            if normalized.is_empty() {
                tracing::info!(
                    user_id,
                    returned = order.len(),
                    "ranking service returned no usable brands; using popularity ranking"
                );
                None
            } else {
                Some(normalized)
            }
        }
        Err(e) => {
            tracing::warn!(
                user_id,
                error = %e,
                "ranking service unavailable; using popularity ranking"
            );
            None
        }
    }
}

/// Keep the service's order for the brands it knows about, then append the
/// brands it left out in discovery order, so ranks stay contiguous.
///
/// Returns an empty list when the service named none of `brand_ids`.
fn normalize_personalized(order: &[i64], brand_ids: &[i64]) -> Vec<i64> {
    let known: HashSet<i64> = brand_ids.iter().copied().collect();
    let mut placed: HashSet<i64> = HashSet::with_capacity(brand_ids.len());
    let mut normalized = Vec::with_capacity(brand_ids.len());

    for &id in order {
        if known.contains(&id) && placed.insert(id) {
            normalized.push(id);
        }
    }
    if normalized.is_empty() {
        return normalized;
    }

    for &id in brand_ids {
        if placed.insert(id) {
            normalized.push(id);
        }
    }
    normalized
}

/// Order brands by descending catalog store count. Counts are fetched
/// concurrently; a failed count is treated as zero.
async fn popularity_order(brand_ids: &[i64], catalog: &dyn StoreCatalog) -> Vec<i64> {
    let counts = join_all(brand_ids.iter().map(|&brand_id| async move {
        match catalog.count_stores_by_brand(brand_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(brand_id, error = %e, "store count failed; treating as 0");
                0
            }
        }
    }))
    .await;

    let mut counted: Vec<(i64, i64)> = brand_ids.iter().copied().zip(counts).collect();
    // sort_by is stable, so equal counts keep discovery order.
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    counted.into_iter().map(|(brand_id, _)| brand_id).collect()
}

fn dedup_in_order(brand_ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(brand_ids.len());
    brand_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}
