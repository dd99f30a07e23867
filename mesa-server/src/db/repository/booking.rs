//! Booking Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{
    Booking, BookingCreate, BookingWithTable, PreOrderStage, ReservationStatus,
};
use sqlx::SqlitePool;

const BOOKING_WITH_TABLE_SELECT: &str = "SELECT b.id, b.code, b.customer_name, b.customer_phone, b.customer_email, b.table_id, t.name as table_name, b.booking_date, b.booking_time, b.guest_count, b.status, b.total_amount, b.pre_order_id, b.pre_order_stage, b.created_at, b.updated_at FROM booking b JOIN dining_table t ON b.table_id = t.id";

pub async fn find_all(
    pool: &SqlitePool,
    date: Option<NaiveDate>,
    status: Option<ReservationStatus>,
) -> RepoResult<Vec<BookingWithTable>> {
    let mut sql = format!("{} WHERE 1=1", BOOKING_WITH_TABLE_SELECT);
    if date.is_some() {
        sql.push_str(" AND b.booking_date = ?");
    }
    if status.is_some() {
        sql.push_str(" AND b.status = ?");
    }
    sql.push_str(" ORDER BY b.booking_date DESC, b.booking_time, b.created_at");

    let mut query = sqlx::query_as::<_, BookingWithTable>(&sql);
    if let Some(d) = date {
        query = query.bind(d);
    }
    if let Some(s) = status {
        query = query.bind(s);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let row = sqlx::query_as::<_, Booking>("SELECT * FROM booking WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Booking>> {
    let row = sqlx::query_as::<_, Booking>("SELECT * FROM booking WHERE code = ?")
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new booking in `pending` state.
///
/// The partial unique index on (table_id, booking_date, booking_time)
/// turns a concurrent duplicate into `RepoError::Duplicate`.
pub async fn create(pool: &SqlitePool, data: &BookingCreate, code: &str) -> RepoResult<Booking> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let stage = if data.wants_pre_order {
        PreOrderStage::Pending
    } else {
        PreOrderStage::Skipped
    };
    sqlx::query(
        "INSERT INTO booking (id, code, customer_name, customer_phone, customer_email, table_id, booking_date, booking_time, guest_count, status, total_amount, pre_order_stage, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
    )
    .bind(id)
    .bind(code)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(&data.customer_email)
    .bind(data.table_id)
    .bind(data.booking_date)
    .bind(&data.booking_time)
    .bind(data.guest_count)
    .bind(ReservationStatus::Pending)
    .bind(stage)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create booking".into()))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: ReservationStatus,
) -> RepoResult<Booking> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE booking SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Booking {id}")))
}

pub async fn set_otp(
    pool: &SqlitePool,
    id: i64,
    otp_code: &str,
    expires_at: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE booking SET otp_code = ?, otp_expires_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(otp_code)
    .bind(expires_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking {id}")));
    }
    Ok(())
}

pub async fn clear_otp(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE booking SET otp_code = NULL, otp_expires_at = NULL, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write the ledger reference + grand total back onto the parent booking
pub async fn attach_pre_order(
    pool: &SqlitePool,
    id: i64,
    pre_order_id: i64,
    grand_total: f64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE booking SET pre_order_id = ?, total_amount = ?, pre_order_stage = ?, updated_at = ? WHERE id = ?",
    )
    .bind(pre_order_id)
    .bind(grand_total)
    .bind(PreOrderStage::Completed)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Booking {id}")));
    }
    Ok(())
}

/// Drop the ledger reference after a cascade deletion
pub async fn detach_pre_order(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE booking SET pre_order_id = NULL, total_amount = 0, pre_order_stage = ?, updated_at = ? WHERE id = ?",
    )
    .bind(PreOrderStage::Skipped)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Any non-cancelled booking already holding (table, date, time)?
pub async fn exists_active_at(
    pool: &SqlitePool,
    table_id: i64,
    date: NaiveDate,
    time: &str,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking WHERE table_id = ? AND booking_date = ? AND booking_time = ? AND status != ?",
    )
    .bind(table_id)
    .bind(date)
    .bind(time)
    .bind(ReservationStatus::Cancelled)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Number of non-cancelled bookings on the day (saturation heuristic input)
pub async fn count_active_on(pool: &SqlitePool, date: NaiveDate) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking WHERE booking_date = ? AND status != ?",
    )
    .bind(date)
    .bind(ReservationStatus::Cancelled)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Number of distinct tables with a non-cancelled booking on the day
pub async fn distinct_tables_on(pool: &SqlitePool, date: NaiveDate) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT table_id) FROM booking WHERE booking_date = ? AND status != ?",
    )
    .bind(date)
    .bind(ReservationStatus::Cancelled)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Times of all non-cancelled bookings on the day (`HH:MM` strings).
///
/// Slot membership is decided in Rust by the slot model, not by SQL
/// string arithmetic.
pub async fn times_on(pool: &SqlitePool, date: NaiveDate) -> RepoResult<Vec<String>> {
    let times: Vec<String> = sqlx::query_scalar(
        "SELECT booking_time FROM booking WHERE booking_date = ? AND status != ?",
    )
    .bind(date)
    .bind(ReservationStatus::Cancelled)
    .fetch_all(pool)
    .await?;
    Ok(times)
}

/// Future non-cancelled bookings referencing the table (delete guard)
pub async fn count_open_for_table(
    pool: &SqlitePool,
    table_id: i64,
    from_date: NaiveDate,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM booking WHERE table_id = ? AND booking_date >= ? AND status IN (?, ?)",
    )
    .bind(table_id)
    .bind(from_date)
    .bind(ReservationStatus::Pending)
    .bind(ReservationStatus::Approved)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
