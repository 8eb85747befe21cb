//! Progress / Stats Aggregator
//!
//! Read-only derived metrics. All percentages are computed over
//! quantities, floored; empty denominators yield zero.

use std::collections::{HashMap, HashSet};

use super::FlowResult;
use crate::db::repository::{order, shop_floor};
use serde::Serialize;
use shared::models::{OrderStoreStatus, ShopFloorStatus, ShopFloorView, StationId};
use sqlx::SqlitePool;

/// Per-station completion percentage
#[derive(Debug, Clone, Serialize)]
pub struct StationProgress {
    pub station_id: i64,
    pub station_name: String,
    pub percentage: i64,
}

/// Finished quantities split into late and on-time
#[derive(Debug, Clone, Default, Serialize)]
pub struct DelayOntime {
    pub delay: i64,
    pub ontime: i64,
    pub total: i64,
}

fn percentage(advanced: i64, total: i64) -> i64 {
    if total == 0 {
        0
    } else {
        advanced * 100 / total
    }
}

/// Completion percentage per station. The assembly line has no
/// advance marker, it reports zero. A store order counts once it has
/// left `pending`; a fabrication order counts once its shop floor has
/// started.
pub async fn progress_track(pool: &SqlitePool) -> FlowResult<Vec<StationProgress>> {
    let store_orders = order::find_all_order_store(pool).await?;
    let store_total: i64 = store_orders.iter().map(|o| o.quantity).sum();
    let store_advanced: i64 = store_orders
        .iter()
        .filter(|o| o.status != OrderStoreStatus::Pending)
        .map(|o| o.quantity)
        .sum();

    let started: HashSet<i64> = shop_floor::find_all(pool)
        .await?
        .into_iter()
        .filter(|f| {
            matches!(
                f.status,
                ShopFloorStatus::InProgress | ShopFloorStatus::Finish
            )
        })
        .map(|f| f.order_id)
        .collect();
    let fab_orders = order::find_all_order_fabrication(pool).await?;
    let fab_total: i64 = fab_orders.iter().map(|o| o.quantity).sum();
    let fab_advanced: i64 = fab_orders
        .iter()
        .filter(|o| started.contains(&o.order_id))
        .map(|o| o.quantity)
        .sum();

    Ok(vec![
        StationProgress {
            station_id: StationId::AssemblyLine.id(),
            station_name: StationId::AssemblyLine.name().to_string(),
            percentage: 0,
        },
        StationProgress {
            station_id: StationId::AssemblyStore.id(),
            station_name: StationId::AssemblyStore.name().to_string(),
            percentage: percentage(store_advanced, store_total),
        },
        StationProgress {
            station_id: StationId::Fabrication.id(),
            station_name: StationId::Fabrication.name().to_string(),
            percentage: percentage(fab_advanced, fab_total),
        },
    ])
}

/// Parts currently being worked on the shop floor
pub async fn production_progress(pool: &SqlitePool) -> FlowResult<Vec<ShopFloorView>> {
    let views = shop_floor::find_all_views(pool).await?;
    Ok(views
        .into_iter()
        .filter(|v| v.shop_floor.status == ShopFloorStatus::InProgress)
        .collect())
}

/// Late vs on-time quantities over finished shop floors. Each bucket
/// sums the fabrication order quantity behind the record.
pub async fn delay_ontime(pool: &SqlitePool) -> FlowResult<DelayOntime> {
    let quantity_by_order: HashMap<i64, i64> = order::find_all_order_fabrication(pool)
        .await?
        .into_iter()
        .map(|o| (o.order_id, o.quantity))
        .collect();
    let finished = shop_floor::find_by_status(pool, ShopFloorStatus::Finish).await?;
    let mut result = DelayOntime::default();
    for record in &finished {
        let quantity = quantity_by_order.get(&record.order_id).copied().unwrap_or(0);
        result.total += quantity;
        match record.time_remaining() {
            Some(remaining) if remaining < 0 => result.delay += quantity,
            _ => result.ontime += quantity,
        }
    }
    Ok(result)
}
