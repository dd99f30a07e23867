//! Admission checks for bookings and private events

use chrono::NaiveDate;
use shared::models::TimeSlot;
use sqlx::SqlitePool;

use super::EventOrigin;
use crate::db::repository::{booking, dining_table, event};
use crate::utils::time::parse_time_hm;
use crate::utils::{AppError, AppResult};
use shared::models::SlotAvailability;

/// Rejection reasons surfaced to clients verbatim
pub const REASON_SLOT_RESERVED: &str = "Slot reserved for a private event";
pub const REASON_TABLE_TAKEN: &str = "Table already booked for the selected date and time";
pub const REASON_SLOT_TAKEN: &str = "Time slot already requested for a private event";
pub const REASON_DAY_SATURATED: &str = "Restaurant is fully booked on the selected date";
pub const REASON_SLOT_HAS_BOOKINGS: &str = "Tables already booked for this time slot";

/// Whole-day saturation heuristic: non-cancelled bookings that day ≥
/// factor × active tables rejects event creation. Assumes two seatings per
/// table; not exact capacity accounting.
pub const SATURATION_FACTOR: i64 = 2;

/// Admission check for a table booking at (table, date, `HH:MM`).
///
/// Errors with [`AppError::Conflict`] carrying the reason; `Ok(())` means
/// the insert may proceed (the partial unique index still backstops races).
pub async fn check_booking_admission(
    pool: &SqlitePool,
    table_id: i64,
    date: NaiveDate,
    time: &str,
) -> AppResult<()> {
    let time_of_day = parse_time_hm(time)?;

    // (a)+(b): a point-in-time inside a window collides with an approved event
    if let Some(slot) = TimeSlot::of_time(time_of_day)
        && event::exists_approved_at(pool, date, slot).await?
    {
        return Err(AppError::conflict(REASON_SLOT_RESERVED));
    }

    // (c): exact (table, date, time) collision
    if booking::exists_active_at(pool, table_id, date, time).await? {
        return Err(AppError::conflict(REASON_TABLE_TAKEN));
    }

    Ok(())
}

/// Admission check for a private event at (date, slot).
pub async fn check_event_admission(
    pool: &SqlitePool,
    date: NaiveDate,
    slot: TimeSlot,
    origin: EventOrigin,
) -> AppResult<()> {
    match origin {
        EventOrigin::Admin => {
            // 管理员只让位给已确认的包场
            if event::exists_approved_at(pool, date, slot).await? {
                return Err(AppError::conflict(REASON_SLOT_TAKEN));
            }
        }
        EventOrigin::Customer => {
            if event::exists_open_at(pool, date, slot).await? {
                return Err(AppError::conflict(REASON_SLOT_TAKEN));
            }

            if day_is_saturated(pool, date).await? {
                return Err(AppError::business_rule(REASON_DAY_SATURATED));
            }

            if slot_has_bookings(pool, date, slot).await? {
                return Err(AppError::conflict(REASON_SLOT_HAS_BOOKINGS));
            }
        }
    }
    Ok(())
}

/// Availability probe for (date, slot): the event checks minus the
/// saturation heuristic, mutating nothing.
pub async fn slot_availability(
    pool: &SqlitePool,
    date: NaiveDate,
    slot: TimeSlot,
) -> AppResult<SlotAvailability> {
    if event::exists_open_at(pool, date, slot).await? {
        return Ok(SlotAvailability::taken(REASON_SLOT_TAKEN));
    }
    if slot_has_bookings(pool, date, slot).await? {
        return Ok(SlotAvailability::taken(REASON_SLOT_HAS_BOOKINGS));
    }
    Ok(SlotAvailability::free())
}

async fn day_is_saturated(pool: &SqlitePool, date: NaiveDate) -> AppResult<bool> {
    let total_tables = dining_table::count_active(pool).await?;
    if total_tables == 0 {
        return Ok(false);
    }
    let booked = booking::count_active_on(pool, date).await?;
    Ok(booked >= SATURATION_FACTOR * total_tables)
}

/// Any non-cancelled booking on the day whose time falls within the slot
async fn slot_has_bookings(pool: &SqlitePool, date: NaiveDate, slot: TimeSlot) -> AppResult<bool> {
    let times = booking::times_on(pool, date).await?;
    let hit = times
        .iter()
        .filter_map(|t| chrono::NaiveTime::parse_from_str(t, "%H:%M").ok())
        .any(|t| TimeSlot::of_time(t) == Some(slot));
    Ok(hit)
}
