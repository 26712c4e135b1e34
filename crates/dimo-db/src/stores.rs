//! Database operations for the `stores` table.

use dimo_core::{Coordinate, RatingAggregate, StoreRecord};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub brand_name: String,
    pub sub_name: String,
    pub category: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub avg_rating: f64,
    pub num_rating: i64,
}

impl From<StoreRow> for StoreRecord {
    fn from(row: StoreRow) -> Self {
        // Stored coordinates are taken as-is; the distance filter rejects
        // anything that does not produce a finite distance.
        StoreRecord {
            id: row.id,
            brand_name: row.brand_name,
            sub_name: row.sub_name,
            category: row.category,
            address: row.address,
            coordinate: Coordinate {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            rating: RatingAggregate {
                average: row.avg_rating,
                count: row.num_rating,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every store in the catalog, ordered by id.
///
/// The order is the discovery order the search pipeline sees, so it must be
/// stable between calls.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_all_stores(pool: &PgPool) -> Result<Vec<StoreRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreRow>(
        "SELECT id, brand_name, sub_name, category, address, latitude, longitude, \
                avg_rating, num_rating \
         FROM stores \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single store by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_store_by_id(pool: &PgPool, id: i64) -> Result<Option<StoreRow>, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(
        "SELECT id, brand_name, sub_name, category, address, latitude, longitude, \
                avg_rating, num_rating \
         FROM stores \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Counts the stores that belong to the brand with the given id.
///
/// Stores reference their brand by name, so the count joins through `brands`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_stores_by_brand(pool: &PgPool, brand_id: i64) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) \
         FROM stores s \
         JOIN brands b ON b.name = s.brand_name \
         WHERE b.id = $1",
    )
    .bind(brand_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
