//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::booking;
use crate::reservations;
use crate::reservations::otp::mask_email;
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    Booking, BookingCreate, BookingPublicView, BookingStatusUpdate, BookingWithTable,
    ReservationStatus,
};

/// Query params for listing bookings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub status: Option<ReservationStatus>,
}

/// GET /api/bookings - 订位列表（可按日期/状态过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<BookingWithTable>>> {
    let date = query.date.as_deref().map(time::parse_date).transpose()?;
    let rows = booking::find_all(&state.pool, date, query.status).await?;
    Ok(Json(rows))
}

/// GET /api/bookings/:id - 单个订位
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Booking>> {
    let row = booking::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;
    Ok(Json(row))
}

/// GET /api/bookings/code/:code - 按预订号查询（未认证，邮箱打码）
pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<BookingPublicView>> {
    let row = booking::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {code}")))?;
    Ok(Json(BookingPublicView {
        code: row.code,
        masked_email: mask_email(&row.customer_email),
        table_id: row.table_id,
        booking_date: row.booking_date,
        booking_time: row.booking_time,
        guest_count: row.guest_count,
        status: row.status,
    }))
}

/// POST /api/bookings - 创建订位
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let booking =
        reservations::booking::create(&state.pool, &payload, state.config.timezone).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id/status - 状态流转（级联 + 通知见 lifecycle）
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    let booking =
        reservations::booking::set_status(&state.pool, &state.notifications, id, payload.status)
            .await?;
    Ok(Json(booking))
}
