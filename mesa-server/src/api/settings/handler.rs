//! Settings API Handlers (门店资料，单行)

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::store_info;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use shared::models::{StoreInfo, StoreInfoUpdate};

/// GET /api/settings - 门店资料（未设置时返回默认值）
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<StoreInfo>> {
    let info = store_info::get(&state.pool).await?;
    Ok(Json(info))
}

/// PUT /api/settings - 更新门店资料（upsert 单行）
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<StoreInfoUpdate>,
) -> AppResult<Json<StoreInfo>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.opening_hours, "opening_hours", MAX_SHORT_TEXT_LEN)?;
    let info = store_info::upsert(&state.pool, &payload).await?;
    Ok(Json(info))
}
