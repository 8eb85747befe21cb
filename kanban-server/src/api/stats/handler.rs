//! Stats API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::flow::stats;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::ShopFloorView;

/// GET /api/v1/stats/progress-track - 各站点完成百分比
pub async fn progress_track(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<stats::StationProgress>>>> {
    let track = stats::progress_track(&state.pool).await?;
    Ok(ok(track))
}

/// GET /api/v1/stats/production-progress - 车间在制零件
pub async fn production_progress(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<ShopFloorView>>>> {
    let active = stats::production_progress(&state.pool).await?;
    Ok(ok(active))
}

/// GET /api/v1/stats/delay-ontime - 延期/准时统计
pub async fn delay_ontime(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<stats::DelayOntime>>> {
    let split = stats::delay_ontime(&state.pool).await?;
    Ok(ok(split))
}
