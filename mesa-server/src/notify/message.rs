//! Notification messages
//!
//! One constructor per business moment, so the wording lives in one place.

use shared::models::{Booking, Event};

/// Delivery target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// The customer's contact email
    Customer(String),
    /// The restaurant operator inbox (resolved by the transport)
    Operator,
}

/// A single outbound message
#[derive(Debug, Clone)]
pub struct Notification {
    pub recipient: Recipient,
    pub subject: String,
    pub body: String,
}

impl Notification {
    fn customer(email: &str, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Customer(email.to_string()),
            subject: subject.into(),
            body: body.into(),
        }
    }

    fn operator(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Operator,
            subject: subject.into(),
            body: body.into(),
        }
    }

    // ── Bookings ────────────────────────────────────────────────────

    pub fn booking_approved(booking: &Booking) -> [Self; 2] {
        let subject = format!("Reservation {} confirmed", booking.code);
        [
            Self::customer(
                &booking.customer_email,
                subject.clone(),
                format!(
                    "Dear {}, your table reservation on {} at {} for {} guests is confirmed.",
                    booking.customer_name,
                    booking.booking_date,
                    booking.booking_time,
                    booking.guest_count
                ),
            ),
            Self::operator(
                subject,
                format!(
                    "Booking {} approved ({} on {} at {}).",
                    booking.code, booking.customer_name, booking.booking_date, booking.booking_time
                ),
            ),
        ]
    }

    pub fn booking_cancelled(booking: &Booking) -> [Self; 2] {
        let subject = format!("Reservation {} cancelled", booking.code);
        [
            Self::customer(
                &booking.customer_email,
                subject.clone(),
                format!(
                    "Dear {}, your table reservation on {} at {} has been cancelled.",
                    booking.customer_name, booking.booking_date, booking.booking_time
                ),
            ),
            Self::operator(
                subject,
                format!(
                    "Booking {} cancelled ({} on {} at {}).",
                    booking.code, booking.customer_name, booking.booking_date, booking.booking_time
                ),
            ),
        ]
    }

    // ── Events ──────────────────────────────────────────────────────

    pub fn event_approved(event: &Event) -> [Self; 2] {
        let subject = format!("Private event {} confirmed", event.code);
        [
            Self::customer(
                &event.contact_email,
                subject.clone(),
                format!(
                    "Dear {}, your private event on {} ({}) for {} guests is confirmed.",
                    event.contact_name, event.event_date, event.time_slot, event.guest_count
                ),
            ),
            Self::operator(
                subject,
                format!(
                    "Event {} approved ({} on {} {}).",
                    event.code, event.contact_name, event.event_date, event.time_slot
                ),
            ),
        ]
    }

    pub fn event_cancelled(event: &Event) -> [Self; 2] {
        let subject = format!("Private event {} cancelled", event.code);
        [
            Self::customer(
                &event.contact_email,
                subject.clone(),
                format!(
                    "Dear {}, your private event on {} ({}) has been cancelled.",
                    event.contact_name, event.event_date, event.time_slot
                ),
            ),
            Self::operator(
                subject,
                format!(
                    "Event {} cancelled ({} on {} {}).",
                    event.code, event.contact_name, event.event_date, event.time_slot
                ),
            ),
        ]
    }

    // ── Cancellation codes ──────────────────────────────────────────

    pub fn otp_code(email: &str, name: &str, reservation_code: &str, otp: &str) -> Self {
        Self::customer(
            email,
            format!("Cancellation code for {reservation_code}"),
            format!(
                "Dear {name}, your cancellation code is {otp}. It expires in 10 minutes."
            ),
        )
    }

    // ── Pre-orders ──────────────────────────────────────────────────

    pub fn pre_order_received(email: &str, name: &str, grand_total: f64) -> [Self; 2] {
        [
            Self::customer(
                email,
                "Pre-order received",
                format!(
                    "Dear {name}, your pre-order was received. Total: {grand_total:.2}."
                ),
            ),
            Self::operator(
                "Pre-order received",
                format!("New pre-order from {name}, total {grand_total:.2}."),
            ),
        ]
    }
}
