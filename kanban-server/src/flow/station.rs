//! Station Workflows
//!
//! Per-station side effects of advancing a kanban card, dispatched
//! through the [`StationFlow`] trait instead of scattered station-id
//! branches. The assembly line keeps no shop-floor record, so its
//! queue advance is an explicit no-effect variant; the store and
//! fabrication stations drive the paired shop-floor row.

use super::{FlowError, FlowResult};
use crate::db::repository::{order, shop_floor};
use async_trait::async_trait;
use shared::models::{Kanban, OrderFabricationStatus, ShopFloorStatus, StationId};
use sqlx::{Sqlite, Transaction};

/// Side effects a station contributes to a card advance. The sync
/// check runs before any transition; the advance hooks run before
/// the card status flip.
#[async_trait]
pub trait StationFlow: Send + Sync {
    /// Verify the card status matches the shadowed record
    async fn check_sync(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()>;

    /// queue → progress side effects
    async fn on_advance_queue(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()>;

    /// progress → done side effects
    async fn on_advance_progress(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()>;
}

/// Resolve the workflow for a card's station
pub fn dispatch(station_id: i64) -> FlowResult<Box<dyn StationFlow>> {
    let station = StationId::from_id(station_id)
        .ok_or_else(|| FlowError::InvalidRequest(format!("Unknown station: {station_id}")))?;
    Ok(match station {
        StationId::AssemblyLine => Box::new(AssemblyLineFlow),
        StationId::AssemblyStore => Box::new(AssemblyStoreFlow),
        StationId::Fabrication => Box::new(FabricationFlow),
    })
}

/// Assembly line: withdrawal cards track the build itself, there is
/// no shop-floor record to mirror
pub struct AssemblyLineFlow;

#[async_trait]
impl StationFlow for AssemblyLineFlow {
    async fn check_sync(
        &self,
        _tx: &mut Transaction<'_, Sqlite>,
        _kanban: &Kanban,
    ) -> FlowResult<()> {
        Ok(())
    }

    async fn on_advance_queue(
        &self,
        _tx: &mut Transaction<'_, Sqlite>,
        _kanban: &Kanban,
    ) -> FlowResult<()> {
        // No downstream record to drive; the card flip is the effect
        Ok(())
    }

    async fn on_advance_progress(
        &self,
        _tx: &mut Transaction<'_, Sqlite>,
        _kanban: &Kanban,
    ) -> FlowResult<()> {
        // finish_date is stamped with the card flip
        Ok(())
    }
}

/// Assembly store: mirrors the shop-floor row of the wrapped order
pub struct AssemblyStoreFlow;

#[async_trait]
impl StationFlow for AssemblyStoreFlow {
    async fn check_sync(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()> {
        check_shop_floor_sync(tx, kanban).await
    }

    async fn on_advance_queue(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()> {
        start_shop_floor(tx, kanban).await
    }

    async fn on_advance_progress(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()> {
        finish_shop_floor(tx, kanban).await
    }
}

/// Fabrication: mirrors the shop-floor row and hands the finished
/// order off to delivery
pub struct FabricationFlow;

#[async_trait]
impl StationFlow for FabricationFlow {
    async fn check_sync(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()> {
        check_shop_floor_sync(tx, kanban).await
    }

    async fn on_advance_queue(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()> {
        start_shop_floor(tx, kanban).await
    }

    async fn on_advance_progress(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        kanban: &Kanban,
    ) -> FlowResult<()> {
        finish_shop_floor(tx, kanban).await
    }
}

// ── shared shop-floor plumbing ─────────────────────────────────────

async fn check_shop_floor_sync(
    tx: &mut Transaction<'_, Sqlite>,
    kanban: &Kanban,
) -> FlowResult<()> {
    let record = shop_floor::find_by_order_id_tx(tx, kanban.order_id)
        .await?
        .ok_or(FlowError::ShopFloorNotFound(kanban.order_id))?;
    let required = kanban.status.required_shop_floor();
    if record.status != required {
        return Err(FlowError::OutOfSync(format!(
            "kanban {:?} requires shop floor {:?}, found {:?}",
            kanban.status, required, record.status
        )));
    }
    Ok(())
}

async fn start_shop_floor(tx: &mut Transaction<'_, Sqlite>, kanban: &Kanban) -> FlowResult<()> {
    let record = shop_floor::find_by_order_id_tx(tx, kanban.order_id)
        .await?
        .ok_or(FlowError::ShopFloorNotFound(kanban.order_id))?;
    if record.plan_start.is_none() || record.plan_finish.is_none() {
        return Err(FlowError::PlanRequired);
    }
    shop_floor::set_status(tx, record.id, ShopFloorStatus::InProgress).await?;
    Ok(())
}

async fn finish_shop_floor(tx: &mut Transaction<'_, Sqlite>, kanban: &Kanban) -> FlowResult<()> {
    let record = shop_floor::find_by_order_id_tx(tx, kanban.order_id)
        .await?
        .ok_or(FlowError::ShopFloorNotFound(kanban.order_id))?;
    if record.status != ShopFloorStatus::InProgress {
        return Err(FlowError::NotInProgress);
    }
    shop_floor::set_status(tx, record.id, ShopFloorStatus::Finish).await?;
    let affected = order::set_order_fabrication_status_by_order(
        tx,
        kanban.order_id,
        OrderFabricationStatus::Deliver,
    )
    .await?;
    if affected == 0 {
        return Err(FlowError::OrderNotFound(kanban.order_id));
    }
    Ok(())
}
