//! Pre-Order Ledger
//!
//! Money calculation uses rust_decimal for precision. All arithmetic is
//! done in `Decimal`, then converted to `f64` for storage/serialization,
//! rounded to 2 decimal places half-up.
//!
//! 单价从菜单快照，之后菜单改价不回写历史台账。

use rust_decimal::prelude::*;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::db::repository::preorder::NewPreOrderItem;
use crate::db::repository::{booking, event, menu_item, preorder};
use crate::utils::{AppError, AppResult};
use shared::models::{PreOrderCreate, PreOrderDetail, PreOrderItemInput, PreOrderParent};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Fixed tax rate applied to the subtotal (5%)
const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Maximum quantity per line
const MAX_QUANTITY: i32 = 999;

/// Computed ledger totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
}

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Compute subtotal / tax / grand total from (unit price, quantity) pairs
pub fn compute_totals(lines: &[(f64, i32)]) -> LedgerTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|(price, qty)| to_decimal(*price) * Decimal::from(*qty))
        .sum();
    let tax = subtotal * TAX_RATE;
    let grand_total = subtotal + tax;
    LedgerTotals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        grand_total: to_f64(grand_total),
    }
}

/// Line total for a single line
pub fn line_total(price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(quantity))
}

fn validate_lines(items: &[PreOrderItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("Pre-order must contain at least one item"));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        if item.quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "quantity exceeds maximum allowed ({MAX_QUANTITY})"
            )));
        }
    }
    Ok(())
}

/// Ensure the parent reservation exists and can still take a pre-order
async fn check_parent(pool: &SqlitePool, parent: PreOrderParent) -> AppResult<()> {
    match parent {
        PreOrderParent::Booking(id) => {
            let row = booking::find_by_id(pool, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Booking {id}")))?;
            if row.status.is_terminal() {
                return Err(AppError::business_rule(
                    "Cannot attach a pre-order to a cancelled or rejected booking",
                ));
            }
            if row.pre_order_id.is_some() {
                return Err(AppError::conflict("Booking already has a pre-order"));
            }
        }
        PreOrderParent::Event(id) => {
            let row = event::find_by_id(pool, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Event {id}")))?;
            if row.status.is_terminal() {
                return Err(AppError::business_rule(
                    "Cannot attach a pre-order to a cancelled or rejected event",
                ));
            }
            if row.pre_order_id.is_some() {
                return Err(AppError::conflict("Event already has a pre-order"));
            }
        }
    }
    Ok(())
}

/// Create a pre-order for an existing booking/event.
///
/// Resolves every line against the menu (all-or-nothing), snapshots
/// name+price, computes totals, persists ledger+items transactionally and
/// writes the ledger id back onto the parent. The write-back failing after
/// the ledger commit is logged and reported, not compensated.
pub async fn create(pool: &SqlitePool, data: &PreOrderCreate) -> AppResult<PreOrderDetail> {
    validate_lines(&data.items)?;
    check_parent(pool, data.parent).await?;

    // Resolve all referenced menu items at once; any miss fails the whole call
    let ids: Vec<i64> = data.items.iter().map(|i| i.menu_item_id).collect();
    let resolved: HashMap<i64, _> = menu_item::find_by_ids(pool, &ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut new_items = Vec::with_capacity(data.items.len());
    for input in &data.items {
        let Some(menu) = resolved.get(&input.menu_item_id) else {
            return Err(AppError::not_found("Menu item"));
        };
        if !menu.is_available {
            return Err(AppError::not_found("Menu item"));
        }
        new_items.push(NewPreOrderItem {
            menu_item_id: menu.id,
            name: menu.name.clone(),
            price: menu.price,
            quantity: input.quantity,
            line_total: line_total(menu.price, input.quantity),
        });
    }

    let lines: Vec<(f64, i32)> = new_items.iter().map(|i| (i.price, i.quantity)).collect();
    let totals = compute_totals(&lines);

    let detail = preorder::create(
        pool,
        data.parent,
        totals.subtotal,
        totals.tax,
        totals.grand_total,
        &new_items,
    )
    .await?;

    // Parent write-back, outside the ledger transaction
    let write_back = match data.parent {
        PreOrderParent::Booking(id) => {
            booking::attach_pre_order(pool, id, detail.pre_order.id, totals.grand_total).await
        }
        PreOrderParent::Event(id) => event::attach_pre_order(pool, id, detail.pre_order.id).await,
    };
    if let Err(e) = write_back {
        tracing::error!(
            pre_order_id = detail.pre_order.id,
            parent_kind = data.parent.kind(),
            parent_id = data.parent.id(),
            error = %e,
            "Pre-order created but parent write-back failed"
        );
        return Err(e.into());
    }

    Ok(detail)
}

/// Cascade helper: remove the ledger attached to a reservation and clear
/// the parent's reference. No-op when nothing is attached.
pub async fn delete_for_parent(pool: &SqlitePool, parent: PreOrderParent) -> AppResult<()> {
    let pre_order_id = match parent {
        PreOrderParent::Booking(id) => booking::find_by_id(pool, id)
            .await?
            .and_then(|b| b.pre_order_id),
        PreOrderParent::Event(id) => event::find_by_id(pool, id)
            .await?
            .and_then(|e| e.pre_order_id),
    };

    let Some(pre_order_id) = pre_order_id else {
        return Ok(());
    };

    preorder::delete(pool, pre_order_id).await?;
    match parent {
        PreOrderParent::Booking(id) => booking::detach_pre_order(pool, id).await?,
        PreOrderParent::Event(id) => event::detach_pre_order(pool, id).await?,
    }
    tracing::debug!(
        pre_order_id,
        parent_kind = parent.kind(),
        parent_id = parent.id(),
        "Pre-order cascade-deleted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_for_known_lines() {
        let totals = compute_totals(&[(100.0, 2), (50.0, 3)]);
        assert_eq!(totals.subtotal, 350.0);
        assert_eq!(totals.tax, 17.5);
        assert_eq!(totals.grand_total, 367.5);
    }

    #[test]
    fn totals_round_half_up_to_cents() {
        // 3 × 0.99 = 2.97, tax 0.1485 → 0.15
        let totals = compute_totals(&[(0.99, 3)]);
        assert_eq!(totals.subtotal, 2.97);
        assert_eq!(totals.tax, 0.15);
        assert_eq!(totals.grand_total, 3.12);
    }

    #[test]
    fn empty_lines_have_zero_totals() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn line_total_multiplies_exactly() {
        assert_eq!(line_total(12.5, 4), 50.0);
        assert_eq!(line_total(0.1, 3), 0.3);
    }
}
