//! Assembly Store API Handlers

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{order, part_store};
use crate::flow::orchestrate;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{
    OrderStoreStatus, OrderStoreWithPart, PartStoreStatusUpdate, PartStoreWithPart,
    StoreOrderStatusUpdate,
};

/// GET /api/v1/assembly-store/orders - 仓库订单列表
pub async fn list_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<OrderStoreWithPart>>>> {
    let orders = order::find_order_store_with_part(&state.pool).await?;
    Ok(ok(orders))
}

/// POST /api/v1/assembly-store/orders/status - 推进仓库订单
///
/// `production` 推送到制造站并开出新看板 (201)；`deliver` 交付到
/// 装配线并回补台账 (200)。
pub async fn update_order_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StoreOrderStatusUpdate>,
) -> AppResult<Response> {
    match payload.status {
        OrderStoreStatus::Production => {
            let kanban = orchestrate::advance_to_fabrication(
                &state.pool,
                payload.id,
                current_user.id,
                &payload.request_host,
            )
            .await?;
            Ok((StatusCode::CREATED, ok(kanban)).into_response())
        }
        OrderStoreStatus::Deliver => {
            orchestrate::deliver_store_order(&state.pool, payload.id).await?;
            Ok(ok_with_message((), "Order delivered").into_response())
        }
        other => Err(AppError::validation(format!(
            "Unsupported store order target: {other:?}"
        ))),
    }
}

/// GET /api/v1/assembly-store/parts - 暂存区列表
pub async fn list_part_stores(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<PartStoreWithPart>>>> {
    let stores = part_store::find_all_with_part(&state.pool).await?;
    Ok(ok(stores))
}

/// PUT /api/v1/assembly-store/parts/status - 入库已交付的制造成品
pub async fn update_part_store_status(
    State(state): State<ServerState>,
    Json(payload): Json<PartStoreStatusUpdate>,
) -> AppResult<Json<AppResponse<i64>>> {
    let delivered =
        orchestrate::receive_delivery(&state.pool, payload.id, payload.status).await?;
    Ok(ok(delivered))
}
