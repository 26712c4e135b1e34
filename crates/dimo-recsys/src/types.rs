//! Ranking service wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /factorization`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankBrandsRequest {
    pub user_id: i64,
    pub brand_ids: Vec<i64>,
}

/// Response of `POST /factorization`: brand ids, most relevant first.
///
/// A missing `brand_ids` field decodes as an empty ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankBrandsResponse {
    #[serde(default)]
    pub brand_ids: Vec<i64>,
}
