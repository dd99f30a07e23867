//! Store Info Repository (singleton row, id = 1)

use super::RepoResult;
use shared::models::{StoreInfo, StoreInfoUpdate};
use sqlx::SqlitePool;

/// Fetch the profile, falling back to defaults when never saved
pub async fn get(pool: &SqlitePool) -> RepoResult<StoreInfo> {
    let row = sqlx::query_as::<_, StoreInfo>("SELECT * FROM store_info WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.unwrap_or_default())
}

pub async fn upsert(pool: &SqlitePool, data: &StoreInfoUpdate) -> RepoResult<StoreInfo> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO store_info (id, name, address, phone, email, opening_hours, created_at, updated_at)
         VALUES (1, COALESCE(?1, ''), COALESCE(?2, ''), ?3, ?4, COALESCE(?5, '10:00-14:00, 18:00-22:00'), ?6, ?6)
         ON CONFLICT(id) DO UPDATE SET
            name = COALESCE(?1, name),
            address = COALESCE(?2, address),
            phone = COALESCE(?3, phone),
            email = COALESCE(?4, email),
            opening_hours = COALESCE(?5, opening_hours),
            updated_at = ?6",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.opening_hours)
    .bind(now)
    .execute(pool)
    .await?;
    get(pool).await
}
