//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithCategory};
use sqlx::SqlitePool;

const MENU_ITEM_WITH_CATEGORY_SELECT: &str = "SELECT m.id, m.category_id, c.name as category_name, m.name, m.description, m.price, m.image_url, m.is_available, m.created_at, m.updated_at FROM menu_item m JOIN category c ON m.category_id = c.id";

pub async fn find_all(
    pool: &SqlitePool,
    category_id: Option<i64>,
) -> RepoResult<Vec<MenuItemWithCategory>> {
    let mut sql = format!("{} WHERE m.is_available = 1", MENU_ITEM_WITH_CATEGORY_SELECT);
    if category_id.is_some() {
        sql.push_str(" AND m.category_id = ?");
    }
    sql.push_str(" ORDER BY c.sort_order, c.name, m.name");

    let mut query = sqlx::query_as::<_, MenuItemWithCategory>(&sql);
    if let Some(cid) = category_id {
        query = query.bind(cid);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_item WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Resolve a set of menu items by id (for pre-order line resolution).
///
/// Returns whatever exists; the caller decides how to treat misses.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT * FROM menu_item WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, MenuItem>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &MenuItemCreate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO menu_item (id, category_id, name, description, price, image_url, is_available, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &MenuItemUpdate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET category_id = COALESCE(?, category_id), name = COALESCE(?, name), description = COALESCE(?, description), price = COALESCE(?, price), image_url = COALESCE(?, image_url), is_available = COALESCE(?, is_available), updated_at = ? WHERE id = ?",
    )
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id}")))
}

/// Soft delete; existing pre-order lines keep their snapshot
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET is_available = 0, updated_at = ? WHERE id = ? AND is_available = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_active_in_category(pool: &SqlitePool, category_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM menu_item WHERE category_id = ? AND is_available = 1",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
