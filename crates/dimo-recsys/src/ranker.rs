use async_trait::async_trait;
use dimo_search::{PersonalizedRanker, SourceError};

use crate::client::RecsysClient;

#[async_trait]
impl PersonalizedRanker for RecsysClient {
    async fn rank_brands_for_user(
        &self,
        user_id: i64,
        brand_ids: &[i64],
    ) -> Result<Vec<i64>, SourceError> {
        RecsysClient::rank_brands_for_user(self, user_id, brand_ids)
            .await
            .map_err(|e| SourceError::backend("ranking service", e))
    }
}
