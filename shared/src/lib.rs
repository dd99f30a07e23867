//! Shared types for the Mesa reservation platform
//!
//! Common types used by mesa-server and (via the HTTP API) by clients:
//! data models, error types, response envelopes and utility functions.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use response::{ApiResponse, PaginatedResponse, Pagination};
