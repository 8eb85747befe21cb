//! Fabrication API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{kanban as kanban_repo, order, shop_floor};
use crate::flow::orchestrate;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{
    KanbanCard, OrderFabricationWithPart, ShopFloorPlanUpdate, ShopFloorStatusUpdate,
    ShopFloorView, StationId,
};

/// GET /api/v1/fabrication/orders - 制造订单列表
pub async fn list_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<OrderFabricationWithPart>>>> {
    let orders = order::find_order_fabrication_with_part(&state.pool).await?;
    Ok(ok(orders))
}

/// GET /api/v1/fabrication/orders/deliver/:order_id - 交付制造订单
pub async fn deliver_order(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    orchestrate::deliver_fabrication(&state.pool, order_id).await?;
    Ok(ok_with_message((), "Fabrication order delivered"))
}

/// GET /api/v1/fabrication/shop-floors - 车间排程列表
pub async fn list_shop_floors(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<ShopFloorView>>>> {
    let views = shop_floor::find_all_views(&state.pool).await?;
    Ok(ok(views))
}

/// GET /api/v1/fabrication/shop-floors/:id - 单条排程
pub async fn get_shop_floor(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<ShopFloorView>>> {
    let view = shop_floor::find_view_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shop floor {id} not found")))?;
    Ok(ok(view))
}

/// PUT /api/v1/fabrication/shop-floors/plan - 设置计划窗口
pub async fn set_plan(
    State(state): State<ServerState>,
    Json(payload): Json<ShopFloorPlanUpdate>,
) -> AppResult<Json<AppResponse<()>>> {
    orchestrate::set_shop_floor_plan(&state.pool, &payload).await?;
    Ok(ok(()))
}

/// PUT /api/v1/fabrication/shop-floors/status - 推进排程状态
pub async fn update_status(
    State(state): State<ServerState>,
    Json(payload): Json<ShopFloorStatusUpdate>,
) -> AppResult<Json<AppResponse<()>>> {
    orchestrate::advance_shop_floor_status(&state.pool, payload.id, payload.status).await?;
    Ok(ok(()))
}

/// GET /api/v1/fabrication/kanbans - 制造站看板列表
pub async fn list_kanbans(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<KanbanCard>>>> {
    let cards =
        kanban_repo::find_cards_by_station(&state.pool, StationId::Fabrication.id()).await?;
    Ok(ok(cards))
}
