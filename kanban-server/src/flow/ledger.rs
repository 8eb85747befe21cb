//! Part Inventory Ledger
//!
//! Quantity arithmetic over the `part` table. Consumption is
//! all-or-nothing: every new quantity is computed and checked before
//! any row is written, so a failed batch leaves the ledger untouched.

use super::{FlowError, FlowResult};
use crate::db::repository::part;
use shared::models::{Part, PartCompleteness};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// One requested decrement
#[derive(Debug, Clone, Copy)]
pub struct StockDelta {
    pub part_id: i64,
    pub amount: i64,
}

/// Decrement a batch of parts atomically. Rejects the whole batch
/// with [`FlowError::InsufficientStock`] if any part would go
/// negative; no partial writes survive a rejection.
pub async fn apply_consumption(
    tx: &mut Transaction<'_, Sqlite>,
    deltas: &[StockDelta],
) -> FlowResult<()> {
    let mut writes: Vec<(i64, i64)> = Vec::with_capacity(deltas.len());
    for delta in deltas {
        let part = part::find_by_id_tx(tx, delta.part_id)
            .await?
            .ok_or_else(|| FlowError::PartNotFound(delta.part_id.to_string()))?;
        let remaining = part.quantity - delta.amount;
        if remaining < 0 {
            return Err(FlowError::InsufficientStock {
                part_number: part.part_number,
                have: part.quantity,
                need: delta.amount,
            });
        }
        writes.push((part.id, remaining));
    }
    for (id, quantity) in writes {
        part::update_quantity_tx(tx, id, quantity).await?;
    }
    Ok(())
}

/// Increment a part's on-hand quantity (delivery confirmation)
pub async fn replenish(
    tx: &mut Transaction<'_, Sqlite>,
    part_id: i64,
    amount: i64,
) -> FlowResult<()> {
    part::replenish_tx(tx, part_id, amount).await?;
    Ok(())
}

/// Manual stock correction; zero and negative values are rejected
pub async fn set_part_quantity(pool: &SqlitePool, id: i64, quantity: i64) -> FlowResult<()> {
    if quantity <= 0 {
        return Err(FlowError::InvalidQuantity(quantity));
    }
    part::find_by_id(pool, id)
        .await?
        .ok_or_else(|| FlowError::PartNotFound(id.to_string()))?;
    part::set_quantity(pool, id, quantity).await?;
    Ok(())
}

/// Display-only readiness flag: complete iff every part covers its
/// per-assembly requirement
pub fn completeness_status(parts: &[Part]) -> PartCompleteness {
    if parts
        .iter()
        .all(|p| p.quantity >= p.quantity_req)
    {
        PartCompleteness::Complete
    } else {
        PartCompleteness::Incomplete
    }
}
