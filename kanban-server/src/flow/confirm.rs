//! Kanban Confirm
//!
//! The card advance state machine. Cards move strictly
//! queue → progress → done; side effects run first and the card
//! status flips last, so a failed side effect can never leave the
//! card ahead of the record it shadows.

use super::{station, FlowError, FlowResult};
use crate::db::repository::{kanban as kanban_repo, order, RepoError};
use shared::models::{Kanban, KanbanStatus};
use sqlx::SqlitePool;

/// Advance a kanban card to `target`, applying the station's side
/// effects in the same transaction
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    target: KanbanStatus,
) -> FlowResult<Kanban> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let mut kanban = kanban_repo::find_by_id_tx(&mut tx, id)
        .await?
        .ok_or_else(|| FlowError::KanbanNotFound(id.to_string()))?;
    order::find_order_by_id_tx(&mut tx, kanban.order_id)
        .await?
        .ok_or(FlowError::OrderNotFound(kanban.order_id))?;

    let flow = station::dispatch(kanban.station_id)?;
    flow.check_sync(&mut tx, &kanban).await?;

    if target == kanban.status {
        return Err(FlowError::NoOp);
    }

    match kanban.status {
        KanbanStatus::Queue => {
            if target != KanbanStatus::Progress {
                return Err(FlowError::InvalidTarget);
            }
            flow.on_advance_queue(&mut tx, &kanban).await?;
        }
        KanbanStatus::Progress => {
            if target != KanbanStatus::Done {
                return Err(FlowError::InvalidTarget);
            }
            flow.on_advance_progress(&mut tx, &kanban).await?;
        }
        KanbanStatus::Done => return Err(FlowError::Terminal),
    }

    // Side effects committed above succeed or the whole tx rolls back
    kanban_repo::set_status(&mut tx, id, target).await?;
    tx.commit().await.map_err(RepoError::from)?;

    kanban.status = target;
    if target == KanbanStatus::Done {
        kanban.finish_date = Some(shared::util::now_millis());
    }
    Ok(kanban)
}
