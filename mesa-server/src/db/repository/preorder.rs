//! Pre-Order Repository
//!
//! 台账行和明细行在一个事务里落库；父引用回写由 ledger 模块负责。

use super::{RepoError, RepoResult};
use shared::models::{PreOrder, PreOrderDetail, PreOrderItem, PreOrderParent, PreOrderStatus};
use sqlx::SqlitePool;

/// Line item ready for insertion, prices already snapshotted by the ledger
#[derive(Debug, Clone)]
pub struct NewPreOrderItem {
    pub menu_item_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Insert the ledger entry and its line items atomically
pub async fn create(
    pool: &SqlitePool,
    parent: PreOrderParent,
    subtotal: f64,
    tax: f64,
    grand_total: f64,
    items: &[NewPreOrderItem],
) -> RepoResult<PreOrderDetail> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO pre_order (id, parent_type, parent_id, subtotal, tax, grand_total, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(parent.kind())
    .bind(parent.id())
    .bind(subtotal)
    .bind(tax)
    .bind(grand_total)
    .bind(PreOrderStatus::Pending)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO pre_order_item (id, pre_order_id, menu_item_id, name, price, quantity, line_total) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(item.line_total)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_detail(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pre-order".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PreOrder>> {
    let row = sqlx::query_as::<_, PreOrder>("SELECT * FROM pre_order WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn items_of(pool: &SqlitePool, pre_order_id: i64) -> RepoResult<Vec<PreOrderItem>> {
    let rows = sqlx::query_as::<_, PreOrderItem>(
        "SELECT * FROM pre_order_item WHERE pre_order_id = ? ORDER BY id",
    )
    .bind(pre_order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<PreOrderDetail>> {
    let Some(pre_order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, id).await?;
    Ok(Some(PreOrderDetail { pre_order, items }))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: PreOrderStatus,
) -> RepoResult<PreOrder> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE pre_order SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Pre-order {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pre-order {id}")))
}

/// Hard delete; line items go with the ledger row (FK cascade)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM pre_order WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
