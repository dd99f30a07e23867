//! 自助取消 (OTP) API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cancellations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/request", post(handler::request))
        .route("/verify", post(handler::verify))
        .route("/resend", post(handler::resend))
        .route("/lookup/{kind}/{code}", get(handler::lookup))
}
