//! Feedback Repository

use super::{RepoError, RepoResult};
use shared::models::{Feedback, FeedbackCreate};
use sqlx::SqlitePool;

pub async fn create(pool: &SqlitePool, data: &FeedbackCreate) -> RepoResult<Feedback> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO feedback (id, customer_name, customer_email, rating, comment, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.customer_name)
    .bind(&data.customer_email)
    .bind(data.rating)
    .bind(&data.comment)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create feedback".into()))
}

/// Newest first, 1-based page
pub async fn find_page(
    pool: &SqlitePool,
    page: u32,
    per_page: u32,
) -> RepoResult<(Vec<Feedback>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
        .fetch_one(pool)
        .await?;
    let offset = (page.saturating_sub(1) as i64) * per_page as i64;
    let rows = sqlx::query_as::<_, Feedback>(
        "SELECT * FROM feedback ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok((rows, total as u64))
}

pub async fn average_rating(pool: &SqlitePool) -> RepoResult<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM feedback")
        .fetch_one(pool)
        .await?;
    Ok(avg)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
