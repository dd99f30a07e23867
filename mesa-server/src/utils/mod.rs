//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型 (from shared::error)
//! - 日志、时间、输入校验等工具

pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

// Re-export error types from shared
pub use result::{AppError, AppResult};
pub use shared::response::ApiResponse;
