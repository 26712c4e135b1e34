//! Database operations for the `brands` table.

use dimo_core::BrandRecord;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
}

impl From<BrandRow> for BrandRecord {
    fn from(row: BrandRow) -> Self {
        BrandRecord {
            id: row.id,
            name: row.name,
            category: row.category,
            image_url: row.image_url,
        }
    }
}

/// Returns the brand with exactly this name, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_name(pool: &PgPool, name: &str) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(
        "SELECT id, name, category, image_url \
         FROM brands \
         WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
