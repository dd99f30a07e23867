//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let rows = dining_table::find_all(&state.pool).await?;
    Ok(Json(rows))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let row = dining_table::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id}")))?;
    Ok(Json(row))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(capacity) = payload.capacity
        && capacity < 1
    {
        return Err(AppError::validation("capacity must be at least 1"));
    }
    let row = dining_table::create(&state.pool, &payload).await?;
    Ok(Json(row))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(capacity) = payload.capacity
        && capacity < 1
    {
        return Err(AppError::validation("capacity must be at least 1"));
    }
    let row = dining_table::update(&state.pool, id, &payload).await?;
    Ok(Json(row))
}

/// DELETE /api/tables/:id - 删除桌台（软删除，有未完成订位时拒绝）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let today = time::today_in(state.config.timezone);
    let result = dining_table::delete(&state.pool, id, today).await?;
    Ok(Json(result))
}
