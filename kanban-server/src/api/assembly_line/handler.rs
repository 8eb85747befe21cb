//! Assembly Line API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{kanban as kanban_repo, part};
use crate::flow::{ledger, orchestrate};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use axum::response::IntoResponse;
use shared::models::{
    Kanban, KanbanBoard, Part, PartCompleteness, PartQuantityUpdate, StartAssembly,
    StoreOrderCreate,
};

/// 零件清单附带齐套状态
#[derive(Serialize)]
pub struct PartInventory {
    pub completeness: PartCompleteness,
    pub parts: Vec<Part>,
}

/// GET /api/v1/assembly-line/parts - 零件清单
pub async fn list_parts(State(state): State<ServerState>) -> AppResult<Json<AppResponse<PartInventory>>> {
    let parts = part::find_all(&state.pool).await?;
    let completeness = ledger::completeness_status(&parts);
    Ok(ok(PartInventory {
        completeness,
        parts,
    }))
}

/// GET /api/v1/assembly-line/parts/:id - 单个零件
pub async fn get_part(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Part>>> {
    let p = part::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Part {id} not found")))?;
    Ok(ok(p))
}

/// PUT /api/v1/assembly-line/parts/quantity - 手工修正库存
pub async fn update_part_quantity(
    State(state): State<ServerState>,
    Json(payload): Json<PartQuantityUpdate>,
) -> AppResult<Json<AppResponse<()>>> {
    ledger::set_part_quantity(&state.pool, payload.id, payload.quantity).await?;
    Ok(ok(()))
}

/// POST /api/v1/assembly-line/orders - 向仓库请求零件
pub async fn create_order(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StoreOrderCreate>,
) -> AppResult<Response> {
    let kanban = orchestrate::create_store_order(&state.pool, &payload, current_user.id).await?;
    Ok((StatusCode::CREATED, ok(kanban)).into_response())
}

/// DELETE /api/v1/assembly-line/orders/:id - 取消订单
pub async fn delete_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    orchestrate::delete_order(&state.pool, id).await?;
    Ok(ok(()))
}

/// POST /api/v1/assembly-line/assemble - 启动一次组装
pub async fn assemble(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<StartAssembly>,
) -> AppResult<Json<AppResponse<Kanban>>> {
    let kanban = orchestrate::start_assembly(&state.pool, &payload, current_user.id).await?;
    Ok(ok(kanban))
}

/// GET /api/v1/assembly-line/kanbans - 看板墙 (按状态分列)
pub async fn kanban_board(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<KanbanBoard>>> {
    let cards = kanban_repo::find_all_cards(&state.pool).await?;
    Ok(ok(KanbanBoard::group(cards)))
}
