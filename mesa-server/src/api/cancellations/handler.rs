//! 自助取消 (OTP) API Handlers
//!
//! 全部按公开预订号寻址，响应里只出现打码邮箱。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::reservations::otp::{self, CancellationResult, OtpChallenge, ReservationKind};
use crate::utils::AppResult;

/// Request / resend payload
#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub kind: ReservationKind,
    pub code: String,
}

/// Verify payload
#[derive(Debug, Deserialize)]
pub struct OtpVerify {
    pub kind: ReservationKind,
    pub code: String,
    pub otp: String,
}

/// POST /api/cancellations/request - 申请取消，下发验证码
pub async fn request(
    State(state): State<ServerState>,
    Json(payload): Json<OtpRequest>,
) -> AppResult<Json<OtpChallenge>> {
    let challenge = otp::request(
        &state.pool,
        &state.notifications,
        payload.kind,
        &payload.code,
    )
    .await?;
    Ok(Json(challenge))
}

/// POST /api/cancellations/resend - 重发验证码（旧码作废）
pub async fn resend(
    State(state): State<ServerState>,
    Json(payload): Json<OtpRequest>,
) -> AppResult<Json<OtpChallenge>> {
    let challenge = otp::request(
        &state.pool,
        &state.notifications,
        payload.kind,
        &payload.code,
    )
    .await?;
    Ok(Json(challenge))
}

/// POST /api/cancellations/verify - 校验验证码并取消预订
pub async fn verify(
    State(state): State<ServerState>,
    Json(payload): Json<OtpVerify>,
) -> AppResult<Json<CancellationResult>> {
    let result = otp::verify(
        &state.pool,
        &state.notifications,
        payload.kind,
        &payload.code,
        &payload.otp,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/cancellations/lookup/:kind/:code - 按预订号查询（邮箱打码）
pub async fn lookup(
    State(state): State<ServerState>,
    Path((kind, code)): Path<(ReservationKind, String)>,
) -> AppResult<Json<OtpChallenge>> {
    let challenge = otp::lookup(&state.pool, kind, &code).await?;
    Ok(Json(challenge))
}
