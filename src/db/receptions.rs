use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Category, Reception};

/// Everything the store needs for one row. The id is assigned by the
/// database, which is what keeps concurrent submissions distinct and
/// ordered.
#[derive(Debug, Clone)]
pub struct NewReception {
    pub category: Category,
    pub received_at: DateTime<Utc>,
    pub item_name: String,
    pub quantity: Option<String>,
    pub supplier: Option<String>,
    pub item_type: Option<String>,
    pub project_manager: Option<String>,
    pub bsl2: bool,
    pub package_status: Option<String>,
    pub storage_location: Option<String>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub lot_number: Option<String>,
    pub catalog_number: Option<String>,
    pub client: Option<String>,
    pub received_by: Option<String>,
    pub received_by_id: Option<String>,
    pub comments: Option<String>,
    pub reference: Option<String>,
    pub enrichment: Option<serde_json::Value>,
    pub enrichment_missing: bool,
}

pub async fn append(pool: &SqlitePool, new: &NewReception) -> Result<Reception, sqlx::Error> {
    sqlx::query_as::<_, Reception>(
        "INSERT INTO receptions (
            category, received_at, item_name, quantity, supplier, item_type,
            project_manager, bsl2, package_status, storage_location, location,
            sub_location, lot_number, catalog_number, client, received_by,
            received_by_id, comments, reference, enrichment, enrichment_missing
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new.category)
    .bind(new.received_at)
    .bind(&new.item_name)
    .bind(&new.quantity)
    .bind(&new.supplier)
    .bind(&new.item_type)
    .bind(&new.project_manager)
    .bind(new.bsl2)
    .bind(&new.package_status)
    .bind(&new.storage_location)
    .bind(&new.location)
    .bind(&new.sub_location)
    .bind(&new.lot_number)
    .bind(&new.catalog_number)
    .bind(&new.client)
    .bind(&new.received_by)
    .bind(&new.received_by_id)
    .bind(&new.comments)
    .bind(&new.reference)
    .bind(&new.enrichment)
    .bind(new.enrichment_missing)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Reception>, sqlx::Error> {
    sqlx::query_as::<_, Reception>("SELECT * FROM receptions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Reception>, sqlx::Error> {
    sqlx::query_as::<_, Reception>(
        "SELECT * FROM receptions ORDER BY id DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM receptions")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
