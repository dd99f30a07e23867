//! Dining Table Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(
        "SELECT * FROM dining_table WHERE is_active = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>("SELECT * FROM dining_table WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &DiningTableCreate) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO dining_table (id, name, capacity, is_active, created_at, updated_at) VALUES (?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.capacity.unwrap_or(4))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &DiningTableUpdate) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET name = COALESCE(?, name), capacity = COALESCE(?, capacity), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.capacity)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining table {id}")))
}

/// Soft delete. Refuses while open bookings still point at the table.
pub async fn delete(pool: &SqlitePool, id: i64, today: NaiveDate) -> RepoResult<bool> {
    let open = super::booking::count_open_for_table(pool, id, today).await?;
    if open > 0 {
        return Err(RepoError::Validation(
            "Cannot delete table with open bookings".into(),
        ));
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of active tables (saturation heuristic input)
pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM dining_table WHERE is_active = 1")
            .fetch_one(pool)
            .await?;
    Ok(count)
}
