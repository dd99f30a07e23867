//! Unified Result Types
//!
//! Type aliases for commonly used Result types across the application.
//! The error type itself lives in `shared::error` so clients can rely on
//! the same envelope.

/// Application-level error type
pub use shared::error::ApiError as AppError;

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;
