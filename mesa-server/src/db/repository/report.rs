//! Report Repository
//!
//! Aggregation queries for the dashboard and the per-day report series.
//! 纯读查询，结果直接喂给 handler 的响应结构。

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{Event, ReservationStatus};
use sqlx::SqlitePool;

/// Booking counts by status for a single day
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.approved + self.rejected + self.cancelled
    }
}

pub async fn booking_status_counts_on(
    pool: &SqlitePool,
    date: NaiveDate,
) -> RepoResult<StatusCounts> {
    let rows: Vec<(ReservationStatus, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM booking WHERE booking_date = ? GROUP BY status",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    let mut counts = StatusCounts::default();
    for (status, n) in rows {
        match status {
            ReservationStatus::Pending => counts.pending = n,
            ReservationStatus::Approved => counts.approved = n,
            ReservationStatus::Rejected => counts.rejected = n,
            ReservationStatus::Cancelled => counts.cancelled = n,
        }
    }
    Ok(counts)
}

pub async fn pending_event_count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event WHERE status = ?")
        .bind(ReservationStatus::Pending)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Approved events within `[from, to]`, soonest first
pub async fn upcoming_events(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
) -> RepoResult<Vec<Event>> {
    let rows = sqlx::query_as::<_, Event>(
        "SELECT * FROM event WHERE status = ? AND event_date BETWEEN ? AND ? ORDER BY event_date, time_slot",
    )
    .bind(ReservationStatus::Approved)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Pre-order revenue (grand totals, non-rejected ledgers) whose parent
/// reservation falls inside `[start, end]`. Cancelled parents excluded.
pub async fn revenue_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<f64> {
    let booking_revenue: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(p.grand_total), 0) FROM pre_order p
         JOIN booking b ON p.parent_type = 'booking' AND p.parent_id = b.id
         WHERE p.status != 'rejected' AND b.status != 'cancelled'
           AND b.booking_date BETWEEN ? AND ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let event_revenue: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(p.grand_total), 0) FROM pre_order p
         JOIN event e ON p.parent_type = 'event' AND p.parent_id = e.id
         WHERE p.status != 'rejected' AND e.status != 'cancelled'
           AND e.event_date BETWEEN ? AND ?",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(booking_revenue + event_revenue)
}

/// Non-cancelled bookings per day within `[start, end]`
pub async fn bookings_per_day(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<Vec<(NaiveDate, i64)>> {
    let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
        "SELECT booking_date, COUNT(*) FROM booking
         WHERE booking_date BETWEEN ? AND ? AND status != 'cancelled'
         GROUP BY booking_date ORDER BY booking_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Non-cancelled events per day within `[start, end]`
pub async fn events_per_day(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<Vec<(NaiveDate, i64)>> {
    let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
        "SELECT event_date, COUNT(*) FROM event
         WHERE event_date BETWEEN ? AND ? AND status != 'cancelled'
         GROUP BY event_date ORDER BY event_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Booking pre-order revenue per day within `[start, end]`
pub async fn revenue_per_day(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<Vec<(NaiveDate, f64)>> {
    let mut rows: Vec<(NaiveDate, f64)> = sqlx::query_as(
        "SELECT b.booking_date, COALESCE(SUM(p.grand_total), 0) FROM pre_order p
         JOIN booking b ON p.parent_type = 'booking' AND p.parent_id = b.id
         WHERE p.status != 'rejected' AND b.status != 'cancelled'
           AND b.booking_date BETWEEN ? AND ?
         GROUP BY b.booking_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let event_rows: Vec<(NaiveDate, f64)> = sqlx::query_as(
        "SELECT e.event_date, COALESCE(SUM(p.grand_total), 0) FROM pre_order p
         JOIN event e ON p.parent_type = 'event' AND p.parent_id = e.id
         WHERE p.status != 'rejected' AND e.status != 'cancelled'
           AND e.event_date BETWEEN ? AND ?
         GROUP BY e.event_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    rows.extend(event_rows);
    Ok(rows)
}
