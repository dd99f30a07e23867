//! End-to-end reservation flow tests over an in-memory SQLite database.
//!
//! Exercises the admission checks, lifecycle cascades, ledger totals and
//! the OTP cancellation flow the way the HTTP handlers drive them.

use chrono::NaiveDate;
use chrono_tz::Tz;
use sqlx::SqlitePool;

use mesa_server::AppError;
use mesa_server::db::DbService;
use mesa_server::db::repository as repo;
use mesa_server::ledger;
use mesa_server::notify::{Notification, NotificationService};
use mesa_server::reservations::{booking as booking_flow, event as event_flow, otp};
use mesa_server::scheduling;
use shared::models::{
    BookingCreate, CategoryCreate, DiningTableCreate, EventCreate, MenuItemCreate, PreOrderCreate,
    PreOrderItemInput, PreOrderParent, PreOrderStage, ReservationStatus, TimeSlot,
};

const TZ: Tz = chrono_tz::Europe::Lisbon;

async fn test_pool() -> SqlitePool {
    DbService::new_in_memory()
        .await
        .expect("in-memory database")
        .pool
}

fn capture() -> (NotificationService, tokio::sync::mpsc::Receiver<Notification>) {
    NotificationService::new(64)
}

fn future_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
}

async fn seed_table(pool: &SqlitePool, name: &str) -> i64 {
    repo::dining_table::create(
        pool,
        &DiningTableCreate {
            name: name.to_string(),
            capacity: Some(4),
        },
    )
    .await
    .expect("seed table")
    .id
}

async fn seed_menu_item(pool: &SqlitePool, name: &str, price: f64) -> i64 {
    let category = match repo::category::find_all(pool).await.unwrap().first() {
        Some(c) => c.id,
        None => {
            repo::category::create(
                pool,
                &CategoryCreate {
                    name: "Mains".to_string(),
                    sort_order: None,
                },
            )
            .await
            .expect("seed category")
            .id
        }
    };
    repo::menu_item::create(
        pool,
        &MenuItemCreate {
            category_id: category,
            name: name.to_string(),
            description: None,
            price,
            image_url: None,
        },
    )
    .await
    .expect("seed menu item")
    .id
}

fn booking_payload(table_id: i64, date: NaiveDate, time: &str) -> BookingCreate {
    BookingCreate {
        customer_name: "Ana Silva".to_string(),
        customer_phone: "+351911111111".to_string(),
        customer_email: "ana.silva@example.com".to_string(),
        table_id,
        booking_date: date,
        booking_time: time.to_string(),
        guest_count: 2,
        wants_pre_order: false,
    }
}

fn event_payload(date: NaiveDate, slot: TimeSlot) -> EventCreate {
    EventCreate {
        contact_name: "Bruno Costa".to_string(),
        contact_phone: "+351922222222".to_string(),
        contact_email: "bruno@example.com".to_string(),
        event_date: date,
        time_slot: slot,
        guest_count: 30,
        special_request: None,
    }
}

// ── Conflict resolution ─────────────────────────────────────────────

#[tokio::test]
async fn double_booking_same_slot_one_wins() {
    let pool = test_pool().await;
    let table = seed_table(&pool, "T1").await;
    let payload = booking_payload(table, future_date(), "19:30");

    let first = booking_flow::create(&pool, &payload, TZ).await;
    assert!(first.is_ok());

    let second = booking_flow::create(&pool, &payload, TZ).await;
    let err = second.expect_err("second booking must be rejected");
    assert!(matches!(err, AppError::Conflict { .. }));
    assert!(err.message().contains("Table already booked"));
}

#[tokio::test]
async fn same_table_different_time_is_fine() {
    let pool = test_pool().await;
    let table = seed_table(&pool, "T1").await;

    booking_flow::create(&pool, &booking_payload(table, future_date(), "12:00"), TZ)
        .await
        .expect("first seating");
    booking_flow::create(&pool, &booking_payload(table, future_date(), "12:30"), TZ)
        .await
        .expect("different time must be accepted");
}

#[tokio::test]
async fn cancelled_booking_frees_the_slot() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;
    let payload = booking_payload(table, future_date(), "20:00");

    let first = booking_flow::create(&pool, &payload, TZ).await.unwrap();
    booking_flow::set_status(&pool, &notifications, first.id, ReservationStatus::Cancelled)
        .await
        .unwrap();

    booking_flow::create(&pool, &payload, TZ)
        .await
        .expect("slot must be free after cancellation");
}

#[tokio::test]
async fn booking_inside_approved_event_window_rejected() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;
    let date = future_date();

    event_flow::create_admin(&pool, &notifications, &event_payload(date, TimeSlot::Morning), TZ)
        .await
        .expect("admin event");

    // 12:00 falls inside the reserved morning window
    let err = booking_flow::create(&pool, &booking_payload(table, date, "12:00"), TZ)
        .await
        .expect_err("window is reserved");
    assert!(matches!(err, AppError::Conflict { .. }));
    assert!(err.message().contains("private event"));

    // 16:00 is outside both windows
    booking_flow::create(&pool, &booking_payload(table, date, "16:00"), TZ)
        .await
        .expect("outside the window is fine");
}

#[tokio::test]
async fn pending_event_blocks_users_but_not_admin() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let date = future_date();

    event_flow::create(&pool, &event_payload(date, TimeSlot::Evening), TZ)
        .await
        .expect("first request");

    // A second user request for the same (date, slot) is rejected
    let err = event_flow::create(&pool, &event_payload(date, TimeSlot::Evening), TZ)
        .await
        .expect_err("slot already requested");
    assert!(matches!(err, AppError::Conflict { .. }));

    // Admin override only yields to an approved collision
    let admin_event = event_flow::create_admin(
        &pool,
        &notifications,
        &event_payload(date, TimeSlot::Evening),
        TZ,
    )
    .await
    .expect("pending request must not block the admin");
    assert_eq!(admin_event.status, ReservationStatus::Approved);

    // Now an approved event occupies the slot, so even the admin is rejected
    let err = event_flow::create_admin(
        &pool,
        &notifications,
        &event_payload(date, TimeSlot::Evening),
        TZ,
    )
    .await
    .expect_err("approved collision blocks everyone");
    assert!(matches!(err, AppError::Conflict { .. }));
}

#[tokio::test]
async fn saturated_day_rejects_event_requests() {
    let pool = test_pool().await;
    let table = seed_table(&pool, "T1").await;
    let date = future_date();

    // One table, two seatings: the day counts as saturated
    booking_flow::create(&pool, &booking_payload(table, date, "12:00"), TZ)
        .await
        .unwrap();
    booking_flow::create(&pool, &booking_payload(table, date, "20:00"), TZ)
        .await
        .unwrap();

    let err = event_flow::create(&pool, &event_payload(date, TimeSlot::Evening), TZ)
        .await
        .expect_err("saturated day");
    assert!(matches!(err, AppError::BusinessRule { .. }));
}

#[tokio::test]
async fn bookings_inside_slot_block_event_requests() {
    let pool = test_pool().await;
    seed_table(&pool, "T1").await;
    let table = seed_table(&pool, "T2").await;
    let date = future_date();

    booking_flow::create(&pool, &booking_payload(table, date, "12:30"), TZ)
        .await
        .unwrap();

    // Morning window holds a booking
    let err = event_flow::create(&pool, &event_payload(date, TimeSlot::Morning), TZ)
        .await
        .expect_err("bookings occupy the slot");
    assert!(matches!(err, AppError::Conflict { .. }));

    // Evening window is untouched
    event_flow::create(&pool, &event_payload(date, TimeSlot::Evening), TZ)
        .await
        .expect("other window must stay open");
}

#[tokio::test]
async fn availability_probe_reports_reason_without_writing() {
    let pool = test_pool().await;
    let date = future_date();

    let free = scheduling::slot_availability(&pool, date, TimeSlot::Morning)
        .await
        .unwrap();
    assert!(free.available);
    assert!(free.reason.is_none());

    event_flow::create(&pool, &event_payload(date, TimeSlot::Morning), TZ)
        .await
        .unwrap();

    let taken = scheduling::slot_availability(&pool, date, TimeSlot::Morning)
        .await
        .unwrap();
    assert!(!taken.available);
    assert!(taken.reason.is_some());
}

// ── Pre-order ledger ────────────────────────────────────────────────

#[tokio::test]
async fn ledger_totals_and_write_back() {
    let pool = test_pool().await;
    let table = seed_table(&pool, "T1").await;
    let starter = seed_menu_item(&pool, "Octopus salad", 100.0).await;
    let main = seed_menu_item(&pool, "Seafood rice", 50.0).await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();

    let detail = ledger::create(
        &pool,
        &PreOrderCreate {
            parent: PreOrderParent::Booking(booking.id),
            items: vec![
                PreOrderItemInput { menu_item_id: starter, quantity: 2 },
                PreOrderItemInput { menu_item_id: main, quantity: 3 },
            ],
        },
    )
    .await
    .expect("ledger created");

    assert_eq!(detail.pre_order.subtotal, 350.0);
    assert_eq!(detail.pre_order.tax, 17.5);
    assert_eq!(detail.pre_order.grand_total, 367.5);
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].line_total, 200.0);

    let booking = repo::booking::find_by_id(&pool, booking.id).await.unwrap().unwrap();
    assert_eq!(booking.pre_order_id, Some(detail.pre_order.id));
    assert_eq!(booking.total_amount, 367.5);
    assert_eq!(booking.pre_order_stage, PreOrderStage::Completed);
}

#[tokio::test]
async fn unresolvable_line_item_fails_whole_ledger() {
    let pool = test_pool().await;
    let table = seed_table(&pool, "T1").await;
    let starter = seed_menu_item(&pool, "Octopus salad", 100.0).await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();

    let err = ledger::create(
        &pool,
        &PreOrderCreate {
            parent: PreOrderParent::Booking(booking.id),
            items: vec![
                PreOrderItemInput { menu_item_id: starter, quantity: 1 },
                PreOrderItemInput { menu_item_id: 999_999, quantity: 1 },
            ],
        },
    )
    .await
    .expect_err("unknown menu item");
    assert!(matches!(err, AppError::NotFound { .. }));

    // No partial creation
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pre_order")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn cancelling_booking_cascades_ledger_deletion() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;
    let item = seed_menu_item(&pool, "Seafood rice", 20.0).await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();
    let detail = ledger::create(
        &pool,
        &PreOrderCreate {
            parent: PreOrderParent::Booking(booking.id),
            items: vec![PreOrderItemInput { menu_item_id: item, quantity: 1 }],
        },
    )
    .await
    .unwrap();

    let cancelled =
        booking_flow::set_status(&pool, &notifications, booking.id, ReservationStatus::Cancelled)
            .await
            .unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert_eq!(cancelled.pre_order_id, None);
    assert_eq!(cancelled.total_amount, 0.0);

    let gone = repo::preorder::find_by_id(&pool, detail.pre_order.id).await.unwrap();
    assert!(gone.is_none());

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pre_order_item")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(items, 0, "line items must go with the ledger");
}

#[tokio::test]
async fn cancelling_without_ledger_is_a_noop_on_the_ledger() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();
    booking_flow::set_status(&pool, &notifications, booking.id, ReservationStatus::Cancelled)
        .await
        .expect("cancel without ledger");
}

#[tokio::test]
async fn rejecting_event_cascades_ledger_deletion() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let item = seed_menu_item(&pool, "Canapés", 8.0).await;

    let event = event_flow::create(&pool, &event_payload(future_date(), TimeSlot::Morning), TZ)
        .await
        .unwrap();
    ledger::create(
        &pool,
        &PreOrderCreate {
            parent: PreOrderParent::Event(event.id),
            items: vec![PreOrderItemInput { menu_item_id: item, quantity: 10 }],
        },
    )
    .await
    .unwrap();

    let rejected =
        event_flow::set_status(&pool, &notifications, event.id, ReservationStatus::Rejected)
            .await
            .unwrap();
    assert_eq!(rejected.status, ReservationStatus::Rejected);
    assert_eq!(rejected.pre_order_id, None);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pre_order")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ── Lifecycle & notifications ───────────────────────────────────────

#[tokio::test]
async fn approval_dispatches_once_and_noop_stays_silent() {
    let pool = test_pool().await;
    let (notifications, mut rx) = capture();
    let table = seed_table(&pool, "T1").await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();

    booking_flow::set_status(&pool, &notifications, booking.id, ReservationStatus::Approved)
        .await
        .unwrap();
    assert!(rx.try_recv().is_ok(), "customer notification");
    assert!(rx.try_recv().is_ok(), "operator notification");
    assert!(rx.try_recv().is_err(), "exactly two messages");

    // Same-value update is a no-op and must not re-dispatch
    let again =
        booking_flow::set_status(&pool, &notifications, booking.id, ReservationStatus::Approved)
            .await
            .unwrap();
    assert_eq!(again.status, ReservationStatus::Approved);
    assert!(rx.try_recv().is_err(), "no-op must stay silent");
}

#[tokio::test]
async fn illegal_transitions_are_rejected() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();
    booking_flow::set_status(&pool, &notifications, booking.id, ReservationStatus::Rejected)
        .await
        .unwrap();

    let err =
        booking_flow::set_status(&pool, &notifications, booking.id, ReservationStatus::Approved)
            .await
            .expect_err("rejected is terminal");
    assert!(matches!(err, AppError::BusinessRule { .. }));
}

#[tokio::test]
async fn admin_event_dispatches_confirmations_immediately() {
    let pool = test_pool().await;
    let (notifications, mut rx) = capture();

    event_flow::create_admin(
        &pool,
        &notifications,
        &event_payload(future_date(), TimeSlot::Morning),
        TZ,
    )
    .await
    .unwrap();

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

// ── OTP cancellation ────────────────────────────────────────────────

#[tokio::test]
async fn otp_round_trip_cancels_and_clears() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();

    let challenge = otp::request(&pool, &notifications, otp::ReservationKind::Booking, &booking.code)
        .await
        .unwrap();
    assert_eq!(challenge.masked_email, "an***@example.com");

    let stored = repo::booking::find_by_id(&pool, booking.id)
        .await
        .unwrap()
        .unwrap();
    let code = stored.otp_code.expect("code issued");
    assert!(stored.otp_expires_at.is_some());

    let result = otp::verify(
        &pool,
        &notifications,
        otp::ReservationKind::Booking,
        &booking.code,
        &code,
    )
    .await
    .expect("correct code within TTL");
    assert_eq!(result.status, ReservationStatus::Cancelled);

    let after = repo::booking::find_by_id(&pool, booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, ReservationStatus::Cancelled);
    assert!(after.otp_code.is_none(), "code cleared");
    assert!(after.otp_expires_at.is_none(), "expiry cleared");
}

#[tokio::test]
async fn wrong_and_expired_codes_are_distinguished() {
    let pool = test_pool().await;
    let (notifications, _rx) = capture();
    let table = seed_table(&pool, "T1").await;

    let booking = booking_flow::create(&pool, &booking_payload(table, future_date(), "19:00"), TZ)
        .await
        .unwrap();
    otp::request(&pool, &notifications, otp::ReservationKind::Booking, &booking.code)
        .await
        .unwrap();

    let err = otp::verify(
        &pool,
        &notifications,
        otp::ReservationKind::Booking,
        &booking.code,
        "000000",
    )
    .await
    .expect_err("wrong code");
    assert!(matches!(err, AppError::InvalidOtp));

    // Force the stored code past its validity window
    let stored = repo::booking::find_by_id(&pool, booking.id)
        .await
        .unwrap()
        .unwrap();
    let code = stored.otp_code.unwrap();
    let past = shared::util::now_millis() - 1_000;
    repo::booking::set_otp(&pool, booking.id, &code, past)
        .await
        .unwrap();

    let err = otp::verify(
        &pool,
        &notifications,
        otp::ReservationKind::Booking,
        &booking.code,
        &code,
    )
    .await
    .expect_err("expired code");
    assert!(matches!(err, AppError::OtpExpired));

    // The booking is untouched by failed attempts
    let after = repo::booking::find_by_id(&pool, booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn lookup_by_code_masks_the_email() {
    let pool = test_pool().await;
    let table = seed_table(&pool, "T1").await;

    let mut payload = booking_payload(table, future_date(), "19:00");
    payload.customer_email = "ab@x.com".to_string();
    let booking = booking_flow::create(&pool, &payload, TZ).await.unwrap();

    let challenge = otp::lookup(&pool, otp::ReservationKind::Booking, &booking.code)
        .await
        .unwrap();
    assert_eq!(challenge.masked_email, "***@x.com");

    let missing = otp::lookup(&pool, otp::ReservationKind::Booking, "BK-NOPE42").await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}
