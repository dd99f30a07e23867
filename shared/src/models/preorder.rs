//! Pre-Order Ledger Model
//!
//! 预点单：挂在一个订位或包场下的菜品清单，金额由服务端计算。
//! 父引用是和类型（sum type），不是字符串判别器 + 裸 ID。

use serde::{Deserialize, Serialize};

/// Pre-order ledger status, independent of the parent's own status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PreOrderStatus {
    Pending,
    Approved,
    Rejected,
}

/// Owning parent of a pre-order: exactly one booking or one event
///
/// Serialized as `{"type": "booking", "id": 123}`.
/// Stored as `parent_type` TEXT + `parent_id` INTEGER columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum PreOrderParent {
    Booking(i64),
    Event(i64),
}

impl PreOrderParent {
    /// Discriminator for the `parent_type` column
    pub fn kind(&self) -> &'static str {
        match self {
            PreOrderParent::Booking(_) => "booking",
            PreOrderParent::Event(_) => "event",
        }
    }

    /// Parent row id
    pub fn id(&self) -> i64 {
        match self {
            PreOrderParent::Booking(id) | PreOrderParent::Event(id) => *id,
        }
    }

    /// Rebuild from the stored columns
    pub fn from_parts(kind: &str, id: i64) -> Option<Self> {
        match kind {
            "booking" => Some(PreOrderParent::Booking(id)),
            "event" => Some(PreOrderParent::Event(id)),
            _ => None,
        }
    }
}

/// Pre-order ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreOrder {
    pub id: i64,
    pub parent: PreOrderParent,
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
    pub status: PreOrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(feature = "db")]
impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for PreOrder {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        let parent_type: String = row.try_get("parent_type")?;
        let parent_id: i64 = row.try_get("parent_id")?;
        let parent = PreOrderParent::from_parts(&parent_type, parent_id).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "parent_type".into(),
                source: format!("unknown parent type: {parent_type}").into(),
            }
        })?;
        Ok(Self {
            id: row.try_get("id")?,
            parent,
            subtotal: row.try_get("subtotal")?,
            tax: row.try_get("tax")?,
            grand_total: row.try_get("grand_total")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Line item with the price snapshot captured at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PreOrderItem {
    pub id: i64,
    pub pre_order_id: i64,
    pub menu_item_id: i64,
    /// Name snapshot; menu renames never rewrite history
    pub name: String,
    /// Unit price snapshot
    pub price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Line item input (prices are resolved server-side, never trusted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreOrderItemInput {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Create pre-order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreOrderCreate {
    pub parent: PreOrderParent,
    pub items: Vec<PreOrderItemInput>,
}

/// Status transition payload (administrative)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreOrderStatusUpdate {
    pub status: PreOrderStatus,
}

/// Ledger entry with its line items
#[derive(Debug, Clone, Serialize)]
pub struct PreOrderDetail {
    #[serde(flatten)]
    pub pre_order: PreOrder,
    pub items: Vec<PreOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_parts_round_trip() {
        let parent = PreOrderParent::Booking(42);
        assert_eq!(parent.kind(), "booking");
        assert_eq!(parent.id(), 42);
        assert_eq!(
            PreOrderParent::from_parts("booking", 42),
            Some(parent)
        );
        assert_eq!(PreOrderParent::from_parts("order", 42), None);
    }

    #[test]
    fn parent_serde_shape() {
        let json = serde_json::to_string(&PreOrderParent::Event(7)).unwrap();
        assert_eq!(json, r#"{"type":"event","id":7}"#);
    }
}
