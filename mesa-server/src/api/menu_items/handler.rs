//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{category, menu_item};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithCategory};

/// Query params for listing menu items
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category_id: Option<i64>,
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation("price must be a non-negative number"));
    }
    Ok(())
}

/// GET /api/menu-items - 菜品列表（可按分类过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItemWithCategory>>> {
    let rows = menu_item::find_all(&state.pool, query.category_id).await?;
    Ok(Json(rows))
}

/// GET /api/menu-items/:id - 单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let row = menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;
    Ok(Json(row))
}

/// POST /api/menu-items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_price(payload.price)?;

    // 分类必须存在且可用
    category::find_by_id(&state.pool, payload.category_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::not_found(format!("Category {}", payload.category_id)))?;

    let row = menu_item::create(&state.pool, &payload).await?;
    Ok(Json(row))
}

/// PUT /api/menu-items/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(category_id) = payload.category_id {
        category::find_by_id(&state.pool, category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::not_found(format!("Category {category_id}")))?;
    }
    let row = menu_item::update(&state.pool, id, &payload).await?;
    Ok(Json(row))
}

/// DELETE /api/menu-items/:id - 下架菜品（软删除，历史快照不受影响）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = menu_item::delete(&state.pool, id).await?;
    Ok(Json(result))
}
