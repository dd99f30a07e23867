//! Repository Module
//!
//! Free functions per table over `&SqlitePool`. Handlers parse/validate,
//! repositories read and write rows, domain modules compose them.

pub mod booking;
pub mod category;
pub mod dining_table;
pub mod event;
pub mod feedback;
pub mod menu_item;
pub mod preorder;
pub mod report;
pub mod store_info;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        // 唯一约束冲突是业务层面的"已存在"，不是系统故障
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for shared::error::ApiError {
    fn from(err: RepoError) -> Self {
        use shared::error::ApiError;
        match err {
            RepoError::NotFound(msg) => ApiError::not_found(msg),
            RepoError::Duplicate(msg) => ApiError::conflict(msg),
            RepoError::Validation(msg) => ApiError::validation(msg),
            RepoError::Database(msg) => ApiError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
