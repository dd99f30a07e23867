//! Private Event API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::event;
use crate::reservations;
use crate::scheduling;
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    Event, EventCreate, EventStatusUpdate, ReservationStatus, SlotAvailability, TimeSlot,
};

/// Query params for listing events
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub status: Option<ReservationStatus>,
}

/// Query params for the availability probe
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub slot: TimeSlot,
}

/// GET /api/events - 包场列表（可按日期/状态过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let date = query.date.as_deref().map(time::parse_date).transpose()?;
    let rows = event::find_all(&state.pool, date, query.status).await?;
    Ok(Json(rows))
}

/// GET /api/events/:id - 单个包场
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let row = event::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
    Ok(Json(row))
}

/// GET /api/events/availability?date=&slot= - 档期查询（只读）
pub async fn availability(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<SlotAvailability>> {
    let date = time::parse_date(&query.date)?;
    let result = scheduling::slot_availability(&state.pool, date, query.slot).await?;
    Ok(Json(result))
}

/// POST /api/events - 用户提交包场请求（pending）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    let event = reservations::event::create(&state.pool, &payload, state.config.timezone).await?;
    Ok(Json(event))
}

/// POST /api/events/admin - 管理员代订（直接 approved，立即发确认）
pub async fn create_admin(
    State(state): State<ServerState>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    let event = reservations::event::create_admin(
        &state.pool,
        &state.notifications,
        &payload,
        state.config.timezone,
    )
    .await?;
    Ok(Json(event))
}

/// PUT /api/events/:id/status - 状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EventStatusUpdate>,
) -> AppResult<Json<Event>> {
    let event =
        reservations::event::set_status(&state.pool, &state.notifications, id, payload.status)
            .await?;
    Ok(Json(event))
}
