//! Private Event Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{Event, EventCreate, ReservationStatus, TimeSlot};
use sqlx::SqlitePool;

pub async fn find_all(
    pool: &SqlitePool,
    date: Option<NaiveDate>,
    status: Option<ReservationStatus>,
) -> RepoResult<Vec<Event>> {
    let mut sql = String::from("SELECT * FROM event WHERE 1=1");
    if date.is_some() {
        sql.push_str(" AND event_date = ?");
    }
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }
    sql.push_str(" ORDER BY event_date DESC, time_slot, created_at");

    let mut query = sqlx::query_as::<_, Event>(&sql);
    if let Some(d) = date {
        query = query.bind(d);
    }
    if let Some(s) = status {
        query = query.bind(s);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Event>> {
    let row = sqlx::query_as::<_, Event>("SELECT * FROM event WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Event>> {
    let row = sqlx::query_as::<_, Event>("SELECT * FROM event WHERE code = ?")
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new event.
///
/// `status` is `pending` on the user path and `approved` on the admin
/// override path; the partial unique index rejects a second approved
/// event on the same (date, slot).
pub async fn create(
    pool: &SqlitePool,
    data: &EventCreate,
    code: &str,
    status: ReservationStatus,
) -> RepoResult<Event> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO event (id, code, contact_name, contact_phone, contact_email, event_date, time_slot, guest_count, special_request, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(code)
    .bind(&data.contact_name)
    .bind(&data.contact_phone)
    .bind(&data.contact_email)
    .bind(data.event_date)
    .bind(data.time_slot)
    .bind(data.guest_count)
    .bind(&data.special_request)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create event".into()))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: ReservationStatus,
) -> RepoResult<Event> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE event SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Event {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Event {id}")))
}

pub async fn set_otp(pool: &SqlitePool, id: i64, otp_code: &str, expires_at: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE event SET otp_code = ?, otp_expires_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(otp_code)
    .bind(expires_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Event {id}")));
    }
    Ok(())
}

pub async fn clear_otp(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE event SET otp_code = NULL, otp_expires_at = NULL, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn attach_pre_order(pool: &SqlitePool, id: i64, pre_order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE event SET pre_order_id = ?, updated_at = ? WHERE id = ?")
        .bind(pre_order_id)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Event {id}")));
    }
    Ok(())
}

pub async fn detach_pre_order(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE event SET pre_order_id = NULL, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Any pending or approved event already holding (date, slot)?
pub async fn exists_open_at(
    pool: &SqlitePool,
    date: NaiveDate,
    slot: TimeSlot,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM event WHERE event_date = ? AND time_slot = ? AND status IN (?, ?)",
    )
    .bind(date)
    .bind(slot)
    .bind(ReservationStatus::Pending)
    .bind(ReservationStatus::Approved)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Any approved event already holding (date, slot)?
pub async fn exists_approved_at(
    pool: &SqlitePool,
    date: NaiveDate,
    slot: TimeSlot,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM event WHERE event_date = ? AND time_slot = ? AND status = ?",
    )
    .bind(date)
    .bind(slot)
    .bind(ReservationStatus::Approved)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}
