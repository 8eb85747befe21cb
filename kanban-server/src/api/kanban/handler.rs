//! Kanban API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::kanban as kanban_repo;
use crate::flow::confirm as confirm_flow;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Kanban, KanbanConfirm, KanbanDetail};

/// GET /api/v1/kanban/:id - 看板卡详情 (扫码后读取)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<KanbanDetail>>> {
    let detail = kanban_repo::find_detail(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Kanban {id} not found")))?;
    Ok(ok(detail))
}

/// PUT /api/v1/kanban/confirm - 推进看板卡状态
pub async fn confirm(
    State(state): State<ServerState>,
    Json(payload): Json<KanbanConfirm>,
) -> AppResult<Json<AppResponse<Kanban>>> {
    let kanban = confirm_flow::update_status(&state.pool, &payload.id, payload.status).await?;
    Ok(ok(kanban))
}
