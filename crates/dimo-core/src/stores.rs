//! Store catalog value types shared by the database, search, and HTTP layers.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A point on the globe in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN/infinite and out-of-range values.
    ///
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLatitude`] or [`CoreError::InvalidLongitude`].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Cumulative user rating for a store.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i64,
}

/// One store in the catalog. Read-only to the search pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: i64,
    pub brand_name: String,
    pub sub_name: String,
    pub category: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub rating: RatingAggregate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
}
