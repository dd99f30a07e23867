//! Customer Feedback Model

use serde::{Deserialize, Serialize};

/// Feedback entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Feedback {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    /// 1..=5
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Submit feedback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
}
