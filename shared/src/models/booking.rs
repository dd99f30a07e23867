//! Booking Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reservation status, shared by bookings and private events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    /// Legal transitions: pending → approved/rejected,
    /// pending/approved → cancelled. Terminal states never move.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        match (self, next) {
            (Pending, Approved) | (Pending, Rejected) => true,
            (Pending, Cancelled) | (Approved, Cancelled) => true,
            _ => false,
        }
    }

    /// Cancelled/rejected reservations cannot be acted on any further
    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Rejected | ReservationStatus::Cancelled)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Pre-order sub-status carried on the booking itself
///
/// `pending` — 客人表示要点餐但还没提交；`completed` — 已挂上预点单；
/// `skipped` — 明确不需要。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PreOrderStage {
    Pending,
    Completed,
    Skipped,
}

/// Table booking entity (散客订位)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    /// Human-readable reservation code (`BK-XXXXXX`), unique
    pub code: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub table_id: i64,
    pub booking_date: NaiveDate,
    /// Time of day, `HH:MM`
    pub booking_time: String,
    pub guest_count: i32,
    pub status: ReservationStatus,
    /// Cancellation code, never serialized to clients
    #[serde(skip_serializing, default)]
    pub otp_code: Option<String>,
    #[serde(skip_serializing, default)]
    pub otp_expires_at: Option<i64>,
    /// Grand total of the attached pre-order (0.0 when none)
    pub total_amount: f64,
    pub pre_order_id: Option<i64>,
    pub pre_order_stage: PreOrderStage,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub table_id: i64,
    pub booking_date: NaiveDate,
    /// `HH:MM`
    pub booking_time: String,
    pub guest_count: i32,
    /// Marks the pre-order stage `pending` instead of `skipped`
    #[serde(default)]
    pub wants_pre_order: bool,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: ReservationStatus,
}

/// Booking with table info (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingWithTable {
    pub id: i64,
    pub code: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub table_id: i64,
    pub table_name: String,
    pub booking_date: NaiveDate,
    pub booking_time: String,
    pub guest_count: i32,
    pub status: ReservationStatus,
    pub total_amount: f64,
    pub pre_order_id: Option<i64>,
    pub pre_order_stage: PreOrderStage,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public lookup view (code-based, unauthenticated); email comes back masked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPublicView {
    pub code: String,
    pub masked_email: String,
    pub table_id: i64,
    pub booking_date: NaiveDate,
    pub booking_time: String,
    pub guest_count: i32,
    pub status: ReservationStatus,
}
