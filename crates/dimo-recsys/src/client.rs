//! HTTP client for the ranking service.
//!
//! Wraps `reqwest` with a per-request timeout and typed request/response
//! bodies. Calls are made exactly once: callers treat any error as a signal
//! to fall back to a locally computed ranking, so there is no retry layer.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::RecsysError;
use crate::types::{RankBrandsRequest, RankBrandsResponse};

const RANK_PATH: &str = "factorization";

/// Client for the personalized brand-ranking service.
///
/// Use [`RecsysClient::new`] with the service base URL; tests point it at a
/// `wiremock` server.
#[derive(Debug, Clone)]
pub struct RecsysClient {
    client: Client,
    endpoint: Url,
}

impl RecsysClient {
    /// Creates a new client with the given base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RecsysError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RecsysError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL or cannot carry a path.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RecsysError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent("dimo/0.1 (store-search)")
            .build()?;

        // Normalise to exactly one trailing slash so `join` appends the
        // endpoint instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(RANK_PATH))
            .map_err(|e| RecsysError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, endpoint })
    }

    /// Asks the service to order `brand_ids` for `user_id`.
    ///
    /// Returns the brand ids in preferred order, most relevant first. The
    /// service may return an empty list; interpreting that is up to the
    /// caller.
    ///
    /// # Errors
    ///
    /// - [`RecsysError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`RecsysError::Deserialize`] if the body does not match the expected shape.
    pub async fn rank_brands_for_user(
        &self,
        user_id: i64,
        brand_ids: &[i64],
    ) -> Result<Vec<i64>, RecsysError> {
        let url = &self.endpoint;
        let request = RankBrandsRequest {
            user_id,
            brand_ids: brand_ids.to_vec(),
        };

        let response = self
            .client
            .post(url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let parsed: RankBrandsResponse =
            serde_json::from_str(&body).map_err(|e| RecsysError::Deserialize {
                context: format!("{url} (user_id={user_id})"),
                source: e,
            })?;

        tracing::debug!(
            user_id,
            requested = brand_ids.len(),
            returned = parsed.brand_ids.len(),
            "ranking service responded"
        );

        Ok(parsed.brand_ids)
    }
}
