//! Order Orchestration
//!
//! Multi-table order lifecycle operations. Each function opens one
//! transaction, runs every effect, and commits; any failure rolls
//! back the whole step.

use super::{ledger, FlowError, FlowResult};
use crate::db::repository::{kanban as kanban_repo, order, part, part_store, shop_floor, RepoError};
use crate::utils::qr;
use shared::models::{
    Kanban, KanbanStatus, KanbanType, OrderFabricationStatus, OrderStoreStatus, PartStoreStatus,
    ShopFloorPlanUpdate, ShopFloorStatus, StartAssembly, StationId, StoreOrderCreate,
    CARD_PRODUCTION, CARD_WITHDRAWAL,
};
use sqlx::SqlitePool;

fn build_kanban(
    kanban_type: KanbanType,
    status: KanbanStatus,
    order_id: i64,
    station: StationId,
    request_host: &str,
) -> FlowResult<Kanban> {
    let id = shared::util::kanban_token();
    let qr_code = qr::generate(&qr::confirm_url(request_host, &id))
        .map_err(|e| FlowError::Internal(format!("QR encoding failed: {e}")))?;
    let now = shared::util::now_millis();
    let card_id = match kanban_type {
        KanbanType::Production => CARD_PRODUCTION,
        KanbanType::Withdrawal => CARD_WITHDRAWAL,
    };
    Ok(Kanban {
        id,
        card_id: card_id.to_string(),
        kanban_type,
        status,
        qr_code,
        order_id,
        station_id: station.id(),
        order_date: now,
        plan_start: now,
        finish_date: None,
        created_at: now,
        updated_at: None,
    })
}

/// Assembly line requests parts: order + store child + production
/// kanban in queue, all in one transaction
pub async fn create_store_order(
    pool: &SqlitePool,
    payload: &StoreOrderCreate,
    created_by: i64,
) -> FlowResult<Kanban> {
    if payload.quantity <= 0 {
        return Err(FlowError::InvalidQuantity(payload.quantity));
    }
    let part = part::find_by_number(pool, &payload.part_number)
        .await?
        .ok_or_else(|| FlowError::PartNotFound(payload.part_number.clone()))?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let order_id = order::insert_order(&mut tx, StationId::AssemblyStore.id(), created_by).await?;
    part_store::ensure_exists(&mut tx, part.id).await?;
    order::insert_order_store(&mut tx, order_id, part.id, payload.quantity).await?;

    let kanban = build_kanban(
        KanbanType::Production,
        KanbanStatus::Queue,
        order_id,
        StationId::AssemblyStore,
        &payload.request_host,
    )?;
    kanban_repo::insert(&mut tx, &kanban).await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(kanban)
}

/// Push a pending store order into fabrication: a new fabrication
/// order with its own shop-floor row and queue kanban
pub async fn advance_to_fabrication(
    pool: &SqlitePool,
    order_store_id: i64,
    created_by: i64,
    request_host: &str,
) -> FlowResult<Kanban> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let store = order::find_order_store_by_id_tx(&mut tx, order_store_id)
        .await?
        .ok_or_else(|| {
            FlowError::InvalidRequest(format!("Store order {order_store_id} not found"))
        })?;
    if store.status != OrderStoreStatus::Pending {
        return Err(FlowError::InvalidTransition(format!(
            "Store order must be pending, found {:?}",
            store.status
        )));
    }

    order::set_order_store_status(&mut tx, store.id, OrderStoreStatus::Production).await?;
    let fab_order_id =
        order::insert_order(&mut tx, StationId::Fabrication.id(), created_by).await?;
    order::insert_order_fabrication(&mut tx, fab_order_id, store.part_id, store.quantity).await?;
    shop_floor::insert(&mut tx, fab_order_id, store.part_id).await?;

    let kanban = build_kanban(
        KanbanType::Production,
        KanbanStatus::Queue,
        fab_order_id,
        StationId::Fabrication,
        request_host,
    )?;
    kanban_repo::insert(&mut tx, &kanban).await?;
    part_store::set_status_by_part(&mut tx, store.part_id, PartStoreStatus::OrderToFabrication)
        .await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(kanban)
}

/// Hand a delivered store order to the line: order closes and the
/// part ledger is replenished by the order quantity
pub async fn deliver_store_order(pool: &SqlitePool, order_store_id: i64) -> FlowResult<()> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let store = order::find_order_store_by_id_tx(&mut tx, order_store_id)
        .await?
        .ok_or_else(|| {
            FlowError::InvalidRequest(format!("Store order {order_store_id} not found"))
        })?;
    if store.status != OrderStoreStatus::Deliver {
        return Err(FlowError::InvalidTransition(format!(
            "Store order must be deliver, found {:?}",
            store.status
        )));
    }
    order::set_order_store_status(&mut tx, store.id, OrderStoreStatus::Finish).await?;
    ledger::replenish(&mut tx, store.part_id, store.quantity).await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(())
}

/// Fabrication ships a finished order back to the store
pub async fn deliver_fabrication(pool: &SqlitePool, order_fab_id: i64) -> FlowResult<()> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let fab = order::find_order_fabrication_by_id_tx(&mut tx, order_fab_id)
        .await?
        .ok_or_else(|| {
            FlowError::InvalidRequest(format!("Fabrication order {order_fab_id} not found"))
        })?;
    if fab.status == OrderFabricationStatus::Finish {
        return Err(FlowError::InvalidTransition(
            "Fabrication order already finished".into(),
        ));
    }
    order::set_order_station(&mut tx, fab.order_id, StationId::AssemblyStore.id()).await?;
    order::set_order_fabrication_status(&mut tx, fab.id, OrderFabricationStatus::Finish).await?;
    order::insert_deliver_order_fabrication(&mut tx, fab.id, fab.part_id).await?;
    part_store::set_status_by_part(&mut tx, fab.part_id, PartStoreStatus::Receive).await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(())
}

/// Book outstanding fabrication receipts into store stock
///
/// Only legal from `receive` and only back to `idle`; every store
/// order for the part covered by the delivered aggregate advances to
/// `deliver`.
pub async fn receive_delivery(
    pool: &SqlitePool,
    part_store_id: i64,
    target: PartStoreStatus,
) -> FlowResult<i64> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let store = part_store::find_by_id_tx(&mut tx, part_store_id)
        .await?
        .ok_or_else(|| {
            FlowError::InvalidRequest(format!("Part store {part_store_id} not found"))
        })?;
    if store.status != PartStoreStatus::Receive {
        return Err(FlowError::InvalidTransition(format!(
            "Part store must be receive, found {:?}",
            store.status
        )));
    }
    if target != PartStoreStatus::Idle {
        return Err(FlowError::InvalidRequest(format!(
            "Receive may only return to idle, requested {target:?}"
        )));
    }

    let receipts = order::find_open_deliveries_by_part(&mut tx, store.part_id).await?;
    if receipts.is_empty() {
        return Err(FlowError::OrderNotFound(store.part_id));
    }
    let mut delivered = 0;
    let mut receipt_ids = Vec::with_capacity(receipts.len());
    for receipt in &receipts {
        let quantity = order::find_order_fabrication_quantity(&mut tx, receipt.order_fab_id)
            .await?
            .ok_or(FlowError::OrderNotFound(receipt.order_fab_id))?;
        delivered += quantity;
        receipt_ids.push(receipt.id);
    }
    order::finish_deliveries(&mut tx, &receipt_ids).await?;
    part_store::receive_stock(&mut tx, store.id, delivered, PartStoreStatus::Idle).await?;

    for store_order in order::find_order_store_by_part_tx(&mut tx, store.part_id).await? {
        let open = matches!(
            store_order.status,
            OrderStoreStatus::Pending | OrderStoreStatus::Production
        );
        if open && store_order.quantity <= delivered {
            order::set_order_store_status(&mut tx, store_order.id, OrderStoreStatus::Deliver)
                .await?;
        }
    }
    tx.commit().await.map_err(RepoError::from)?;
    Ok(delivered)
}

/// Cancel an order and everything it owns. Rejected once shop-floor
/// work has started.
pub async fn delete_order(pool: &SqlitePool, order_id: i64) -> FlowResult<()> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    order::find_order_by_id_tx(&mut tx, order_id)
        .await?
        .ok_or(FlowError::OrderNotFound(order_id))?;
    if let Some(record) = shop_floor::find_by_order_id_tx(&mut tx, order_id).await? {
        if matches!(
            record.status,
            ShopFloorStatus::InProgress | ShopFloorStatus::Finish
        ) {
            return Err(FlowError::OrderLocked(order_id));
        }
    }
    order::delete_order_cascade(&mut tx, order_id).await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(())
}

/// Start an assembly run: consume every part's required quantity
/// atomically, record the component mapping on first run, and open a
/// withdrawal kanban in progress
pub async fn start_assembly(
    pool: &SqlitePool,
    payload: &StartAssembly,
    created_by: i64,
) -> FlowResult<Kanban> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let parts = part::find_all_tx(&mut tx).await?;
    let deltas: Vec<ledger::StockDelta> = parts
        .iter()
        .filter(|p| p.quantity_req > 0)
        .map(|p| ledger::StockDelta {
            part_id: p.id,
            amount: p.quantity_req,
        })
        .collect();
    if deltas.is_empty() {
        return Err(FlowError::InvalidRequest(
            "No parts with a required quantity".into(),
        ));
    }
    ledger::apply_consumption(&mut tx, &deltas).await?;

    if part::find_component(&mut tx, payload.component_id).await?.is_none() {
        let name = format!("Component-{}", payload.component_id);
        part::insert_component(&mut tx, payload.component_id, &name).await?;
    }
    if !part::component_mapping_exists(&mut tx, payload.component_id).await? {
        for delta in &deltas {
            part::insert_component_mapping(&mut tx, payload.component_id, delta.part_id).await?;
        }
    }

    let order_id = order::insert_order(&mut tx, StationId::AssemblyLine.id(), created_by).await?;
    order::insert_order_line(&mut tx, order_id, payload.component_id, 1).await?;

    let kanban = build_kanban(
        KanbanType::Withdrawal,
        KanbanStatus::Progress,
        order_id,
        StationId::AssemblyLine,
        &payload.request_host,
    )?;
    kanban_repo::insert(&mut tx, &kanban).await?;
    kanban_repo::insert_withdrawal(
        &mut tx,
        &kanban.id,
        StationId::AssemblyStore.id(),
        StationId::AssemblyLine.id(),
    )
    .await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(kanban)
}

/// Store the planned shop-floor window; silently ignored once the
/// actuals are committed
pub async fn set_shop_floor_plan(pool: &SqlitePool, payload: &ShopFloorPlanUpdate) -> FlowResult<()> {
    let plan_start = crate::utils::time::parse_datetime_millis(&payload.plan_start)
        .map_err(|_| FlowError::InvalidDate(payload.plan_start.clone()))?;
    let plan_finish = crate::utils::time::parse_datetime_millis(&payload.plan_finish)
        .map_err(|_| FlowError::InvalidDate(payload.plan_finish.clone()))?;
    if plan_start >= plan_finish {
        return Err(FlowError::InvalidRange);
    }
    let record = shop_floor::find_by_id(pool, payload.id)
        .await?
        .ok_or(FlowError::ShopFloorNotFound(payload.id))?;
    if record.actual_start.is_some() || record.actual_finish.is_some() {
        return Ok(());
    }
    shop_floor::set_plan(pool, payload.id, plan_start, plan_finish).await?;
    Ok(())
}

/// Advance the shop-floor status directly (operator console path)
pub async fn advance_shop_floor_status(
    pool: &SqlitePool,
    id: i64,
    target: ShopFloorStatus,
) -> FlowResult<()> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let record = shop_floor::find_by_id_tx(&mut tx, id)
        .await?
        .ok_or(FlowError::ShopFloorNotFound(id))?;
    if !record.status.can_advance_to(target) {
        return Err(FlowError::InvalidTransition(format!(
            "Shop floor {:?} cannot advance to {target:?}",
            record.status
        )));
    }
    if target == ShopFloorStatus::InProgress
        && (record.plan_start.is_none() || record.plan_finish.is_none())
    {
        return Err(FlowError::PlanRequired);
    }
    shop_floor::set_status(&mut tx, id, target).await?;
    if target == ShopFloorStatus::Finish {
        let affected = order::set_order_fabrication_status_by_order(
            &mut tx,
            record.order_id,
            OrderFabricationStatus::Deliver,
        )
        .await?;
        if affected == 0 {
            return Err(FlowError::OrderNotFound(record.order_id));
        }
    }
    tx.commit().await.map_err(RepoError::from)?;
    Ok(())
}
