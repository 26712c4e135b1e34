use std::time::Duration;

use dimo_core::{Coordinate, RatingAggregate, StoreRecord};
use serde::Serialize;

/// A store admitted to one search's result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub store_id: i64,
    pub brand_name: String,
    /// Resolved brand identifier; `None` when the brand directory had no
    /// entry for `brand_name`.
    pub brand_id: Option<i64>,
    pub sub_name: String,
    pub category: String,
    pub address: String,
    pub coordinate: Coordinate,
    /// Kilometres from the search origin. Never exceeds the search radius.
    pub distance_km: f64,
    /// 1-based brand rank, lower is more relevant. `0` means unranked.
    pub rank: u32,
    pub rating: RatingAggregate,
}

impl ScoredCandidate {
    /// Admit `store` at `distance_km` with no rank yet.
    #[must_use]
    pub fn from_store(store: &StoreRecord, brand_id: Option<i64>, distance_km: f64) -> Self {
        Self {
            store_id: store.id,
            brand_name: store.brand_name.clone(),
            brand_id,
            sub_name: store.sub_name.clone(),
            category: store.category.clone(),
            address: store.address.clone(),
            coordinate: store.coordinate,
            distance_km,
            rank: 0,
            rating: store.rating,
        }
    }

    /// Rank used for ordering: unranked sorts after every real rank.
    #[must_use]
    pub fn ordering_rank(&self) -> u32 {
        if self.rank == 0 {
            u32::MAX
        } else {
            self.rank
        }
    }
}

/// One nearby-store search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub user_id: i64,
    pub origin: Coordinate,
    pub radius_km: f64,
}

/// Which path produced the brand ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingSource {
    Personalized,
    Popularity,
}

impl std::fmt::Display for RankingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingSource::Personalized => write!(f, "personalized"),
            RankingSource::Popularity => write!(f, "popularity"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Final order: brand-diverse head, then rank/distance order.
    pub stores: Vec<ScoredCandidate>,
    pub ranking_source: RankingSource,
    /// Snapshot stores that fell outside the radius.
    pub rejected: usize,
    /// Wall-clock time spent in the pipeline.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(rank: u32) -> ScoredCandidate {
        ScoredCandidate {
            store_id: 1,
            brand_name: "A".to_string(),
            brand_id: Some(1),
            sub_name: String::new(),
            category: String::new(),
            address: String::new(),
            coordinate: Coordinate {
                latitude: 0.0,
                longitude: 0.0,
            },
            distance_km: 0.0,
            rank,
            rating: RatingAggregate::default(),
        }
    }

    #[test]
    fn unranked_orders_after_any_rank() {
        assert_eq!(candidate(0).ordering_rank(), u32::MAX);
        assert!(candidate(1).ordering_rank() < candidate(0).ordering_rank());
        assert!(candidate(500).ordering_rank() < candidate(0).ordering_rank());
    }

    #[test]
    fn ranking_source_serializes_lowercase() {
        let json = serde_json::to_string(&RankingSource::Popularity).expect("serialize");
        assert_eq!(json, "\"popularity\"");
        assert_eq!(RankingSource::Personalized.to_string(), "personalized");
    }
}
