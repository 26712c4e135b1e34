use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use dimo_core::Coordinate;
use dimo_search::{RankingSource, ScoredCandidate, SearchRequest};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_search_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Raw query parameters. Parsed by hand so each bad field gets its own
/// message instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct NearbyQuery {
    pub user_id: Option<String>,
    pub lat: Option<String>,
    pub long: Option<String>,
    pub km_limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct OriginQuery {
    pub lat: Option<String>,
    pub long: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    pub id: i64,
    pub brand_name: String,
    pub sub_name: String,
    pub category: String,
    pub logo_url: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
    pub recommend_rank: u32,
    pub avg_rating: f64,
    pub num_rating: i64,
}

impl StoreItem {
    fn from_candidate(candidate: ScoredCandidate, logo_url: &str) -> Self {
        Self {
            id: candidate.store_id,
            brand_name: candidate.brand_name,
            sub_name: candidate.sub_name,
            category: candidate.category,
            logo_url: logo_url.to_string(),
            address: candidate.address,
            latitude: candidate.coordinate.latitude,
            longitude: candidate.coordinate.longitude,
            distance: candidate.distance_km,
            recommend_rank: candidate.rank,
            avg_rating: candidate.rating.average,
            num_rating: candidate.rating.count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyStores {
    pub stores: Vec<StoreItem>,
    /// Pipeline wall-clock time in seconds.
    pub process_time: f64,
    pub ranking: RankingSource,
}

pub(super) async fn list_nearby_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<NearbyStores>>, ApiError> {
    let request = parse_nearby_query(&query)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let snapshot = state.catalog.current().await;
    let result = state
        .engine
        .search(&snapshot, &request)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    let process_time = result.elapsed.as_secs_f64();
    let stores = result
        .stores
        .into_iter()
        .map(|candidate| StoreItem::from_candidate(candidate, &state.store_logo_url))
        .collect();

    Ok(Json(ApiResponse {
        data: NearbyStores {
            stores,
            process_time,
            ranking: result.ranking_source,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    Query(query): Query<OriginQuery>,
) -> Result<Json<ApiResponse<StoreItem>>, ApiError> {
    let (origin, store_id) = parse_store_lookup(&query, &raw_id)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let candidate = state
        .engine
        .store_detail(store_id, origin)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "Store not found"))?;

    Ok(Json(ApiResponse {
        data: StoreItem::from_candidate(candidate, &state.store_logo_url),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn parse_nearby_query(query: &NearbyQuery) -> Result<SearchRequest, &'static str> {
    let radius_km = parse_float(query.km_limit.as_deref())
        .filter(|km| *km > 0.0)
        .ok_or("Invalid km limit")?;
    let origin = parse_origin(query.lat.as_deref(), query.long.as_deref())?;
    let user_id = parse_id(query.user_id.as_deref()).ok_or("Invalid User ID")?;

    Ok(SearchRequest {
        user_id,
        origin,
        radius_km,
    })
}

fn parse_store_lookup(query: &OriginQuery, raw_id: &str) -> Result<(Coordinate, i64), &'static str> {
    let origin = parse_origin(query.lat.as_deref(), query.long.as_deref())?;
    let store_id = parse_id(Some(raw_id)).ok_or("Invalid Store ID")?;
    Ok((origin, store_id))
}

fn parse_origin(lat: Option<&str>, long: Option<&str>) -> Result<Coordinate, &'static str> {
    let latitude = parse_float(lat)
        .filter(|v| (-90.0..=90.0).contains(v))
        .ok_or("Invalid User's latitude")?;
    let longitude = parse_float(long)
        .filter(|v| (-180.0..=180.0).contains(v))
        .ok_or("Invalid User's longitude")?;
    Ok(Coordinate {
        latitude,
        longitude,
    })
}

fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok()
}
