//! Private Event Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::ReservationStatus;
use super::slot::TimeSlot;

/// Private event entity (包场预订), occupies a whole named time window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    /// Human-readable reservation code (`EV-XXXXXX`), unique
    pub code: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub guest_count: i32,
    pub special_request: Option<String>,
    pub status: ReservationStatus,
    /// Cancellation code, never serialized to clients
    #[serde(skip_serializing, default)]
    pub otp_code: Option<String>,
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<i64>,
    pub pre_order_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create event payload (user-submitted request, lands in `pending`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreate {
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub guest_count: i32,
    pub special_request: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStatusUpdate {
    pub status: ReservationStatus,
}

/// Availability check result for a (date, slot) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SlotAvailability {
    pub fn free() -> Self {
        Self { available: true, reason: None }
    }

    pub fn taken(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }
}
