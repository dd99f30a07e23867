//! Store Info Model

use serde::{Deserialize, Serialize};

/// Restaurant profile (singleton row)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoreInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Free-text opening hours shown to customers
    #[serde(default = "default_opening_hours")]
    pub opening_hours: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

fn default_opening_hours() -> String {
    "10:00-14:00, 18:00-22:00".to_string()
}

/// Update store info payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreInfoUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
}
