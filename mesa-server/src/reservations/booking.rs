//! Booking lifecycle

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db::repository::{self, RepoError};
use crate::ledger;
use crate::notify::{Notification, NotificationService};
use crate::scheduling::{self, REASON_TABLE_TAKEN};
use crate::utils::validation::{
    MAX_BOOKING_GUESTS, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_guest_count,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, time};
use shared::models::{Booking, BookingCreate, PreOrderParent, ReservationStatus};

/// Create a table booking in `pending` state.
///
/// Admission checks run first; the partial unique index turns a lost race
/// into `Duplicate`, surfaced with the same reason as the pre-check.
pub async fn create(
    pool: &SqlitePool,
    data: &BookingCreate,
    tz: Tz,
) -> AppResult<Booking> {
    validate_required_text(&data.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&data.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_email(&data.customer_email, "customer_email")?;
    validate_guest_count(data.guest_count, MAX_BOOKING_GUESTS)?;
    time::parse_time_hm(&data.booking_time)?;
    time::validate_not_past(data.booking_date, tz)?;

    let table = repository::dining_table::find_by_id(pool, data.table_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {}", data.table_id)))?;
    if !table.is_active {
        return Err(AppError::validation("Table is not available for booking"));
    }

    scheduling::check_booking_admission(pool, data.table_id, data.booking_date, &data.booking_time)
        .await?;

    let code = shared::util::reservation_code("BK");
    match repository::booking::create(pool, data, &code).await {
        Ok(booking) => {
            tracing::info!(code = %booking.code, table_id = booking.table_id, "Booking created");
            Ok(booking)
        }
        // Lost the race after the pre-check passed
        Err(RepoError::Duplicate(_)) => Err(AppError::conflict(REASON_TABLE_TAKEN)),
        Err(e) => Err(e.into()),
    }
}

/// Transition a booking to a new status.
///
/// Fetching the prior record first is mandatory: a same-value update is a
/// no-op and must not re-trigger notifications. Cancellation cascades the
/// pre-order deletion; approval and cancellation dispatch notifications.
pub async fn set_status(
    pool: &SqlitePool,
    notifications: &NotificationService,
    id: i64,
    new_status: ReservationStatus,
) -> AppResult<Booking> {
    let prior = repository::booking::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;

    if prior.status == new_status {
        return Ok(prior);
    }

    if !prior.status.can_transition_to(new_status) {
        return Err(AppError::business_rule(format!(
            "Cannot change booking status from {} to {}",
            prior.status, new_status
        )));
    }

    let mut booking = repository::booking::update_status(pool, id, new_status).await?;

    if new_status == ReservationStatus::Cancelled {
        ledger::delete_for_parent(pool, PreOrderParent::Booking(id)).await?;
        repository::booking::clear_otp(pool, id).await?;
        booking = repository::booking::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;
    }

    match new_status {
        ReservationStatus::Approved => {
            notifications.dispatch_all(Notification::booking_approved(&booking));
        }
        ReservationStatus::Cancelled => {
            notifications.dispatch_all(Notification::booking_cancelled(&booking));
        }
        _ => {}
    }

    tracing::info!(code = %booking.code, from = %prior.status, to = %new_status, "Booking status changed");
    Ok(booking)
}
