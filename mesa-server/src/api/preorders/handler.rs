//! Pre-Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{booking, event, preorder};
use crate::ledger;
use crate::notify::Notification;
use crate::utils::{AppError, AppResult};
use shared::models::{
    PreOrder, PreOrderCreate, PreOrderDetail, PreOrderParent, PreOrderStatusUpdate,
};

/// POST /api/pre-orders - 创建预点单（金额服务端计算）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PreOrderCreate>,
) -> AppResult<Json<PreOrderDetail>> {
    let detail = ledger::create(&state.pool, &payload).await?;

    // 受理确认，尽力而为
    let contact = match payload.parent {
        PreOrderParent::Booking(id) => booking::find_by_id(&state.pool, id)
            .await?
            .map(|b| (b.customer_email, b.customer_name)),
        PreOrderParent::Event(id) => event::find_by_id(&state.pool, id)
            .await?
            .map(|e| (e.contact_email, e.contact_name)),
    };
    if let Some((email, name)) = contact {
        state.notifications.dispatch_all(Notification::pre_order_received(
            &email,
            &name,
            detail.pre_order.grand_total,
        ));
    }

    Ok(Json(detail))
}

/// GET /api/pre-orders/:id - 台账明细
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PreOrderDetail>> {
    let detail = preorder::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Pre-order {id}")))?;
    Ok(Json(detail))
}

/// PUT /api/pre-orders/:id/status - 管理员审核（独立于父预订状态）
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PreOrderStatusUpdate>,
) -> AppResult<Json<PreOrder>> {
    let row = preorder::update_status(&state.pool, id, payload.status).await?;
    Ok(Json(row))
}
