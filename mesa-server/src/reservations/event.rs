//! Private event lifecycle

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db::repository::{self, RepoError};
use crate::ledger;
use crate::notify::{Notification, NotificationService};
use crate::scheduling::{self, EventOrigin, REASON_SLOT_TAKEN};
use crate::utils::validation::{
    MAX_EVENT_GUESTS, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email,
    validate_guest_count, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};
use shared::models::{Event, EventCreate, PreOrderParent, ReservationStatus};

fn validate(data: &EventCreate, tz: Tz) -> AppResult<()> {
    validate_required_text(&data.contact_name, "contact_name", MAX_NAME_LEN)?;
    validate_required_text(&data.contact_phone, "contact_phone", MAX_SHORT_TEXT_LEN)?;
    validate_email(&data.contact_email, "contact_email")?;
    validate_guest_count(data.guest_count, MAX_EVENT_GUESTS)?;
    validate_optional_text(&data.special_request, "special_request", MAX_NOTE_LEN)?;
    time::validate_not_past(data.event_date, tz)?;
    Ok(())
}

/// Create a private event request (user path, lands in `pending`).
pub async fn create(pool: &SqlitePool, data: &EventCreate, tz: Tz) -> AppResult<Event> {
    validate(data, tz)?;
    scheduling::check_event_admission(pool, data.event_date, data.time_slot, EventOrigin::Customer)
        .await?;

    let code = shared::util::reservation_code("EV");
    let event =
        repository::event::create(pool, data, &code, ReservationStatus::Pending).await?;
    tracing::info!(code = %event.code, date = %event.event_date, slot = %event.time_slot, "Event requested");
    Ok(event)
}

/// Administrative creation path: bypasses the pending-collision and
/// saturation checks, created directly `approved`, confirmations go out
/// immediately.
pub async fn create_admin(
    pool: &SqlitePool,
    notifications: &NotificationService,
    data: &EventCreate,
    tz: Tz,
) -> AppResult<Event> {
    validate(data, tz)?;
    scheduling::check_event_admission(pool, data.event_date, data.time_slot, EventOrigin::Admin)
        .await?;

    let code = shared::util::reservation_code("EV");
    let event = match repository::event::create(pool, data, &code, ReservationStatus::Approved)
        .await
    {
        Ok(event) => event,
        // Approved slot index: two concurrent admin overrides, one loses
        Err(RepoError::Duplicate(_)) => return Err(AppError::conflict(REASON_SLOT_TAKEN)),
        Err(e) => return Err(e.into()),
    };

    notifications.dispatch_all(Notification::event_approved(&event));
    tracing::info!(code = %event.code, date = %event.event_date, slot = %event.time_slot, "Event created by admin");
    Ok(event)
}

/// Transition an event to a new status.
///
/// Mirrors the booking lifecycle; rejection also cascades the pre-order
/// deletion. Approving consumes the slot; the approved partial index
/// rejects a second approval on the same (date, slot).
pub async fn set_status(
    pool: &SqlitePool,
    notifications: &NotificationService,
    id: i64,
    new_status: ReservationStatus,
) -> AppResult<Event> {
    let prior = repository::event::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;

    if prior.status == new_status {
        return Ok(prior);
    }

    if !prior.status.can_transition_to(new_status) {
        return Err(AppError::business_rule(format!(
            "Cannot change event status from {} to {}",
            prior.status, new_status
        )));
    }

    let mut event = match repository::event::update_status(pool, id, new_status).await {
        Ok(event) => event,
        Err(RepoError::Duplicate(_)) => return Err(AppError::conflict(REASON_SLOT_TAKEN)),
        Err(e) => return Err(e.into()),
    };

    if matches!(
        new_status,
        ReservationStatus::Cancelled | ReservationStatus::Rejected
    ) {
        ledger::delete_for_parent(pool, PreOrderParent::Event(id)).await?;
        repository::event::clear_otp(pool, id).await?;
        event = repository::event::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    }

    match new_status {
        ReservationStatus::Approved => {
            notifications.dispatch_all(Notification::event_approved(&event));
        }
        ReservationStatus::Cancelled => {
            notifications.dispatch_all(Notification::event_cancelled(&event));
        }
        _ => {}
    }

    tracing::info!(code = %event.code, from = %prior.status, to = %new_status, "Event status changed");
    Ok(event)
}
