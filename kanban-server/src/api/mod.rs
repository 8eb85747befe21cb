//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`assembly_line`] - 装配线接口 (零件、组装、看板墙)
//! - [`assembly_store`] - 装配仓库接口 (仓库订单、暂存区)
//! - [`fabrication`] - 制造站接口 (制造订单、车间排程)
//! - [`kanban`] - 看板卡接口 (读取、确认推进)
//! - [`stats`] - 进度统计接口

pub mod assembly_line;
pub mod assembly_store;
pub mod fabrication;
pub mod health;
pub mod kanban;
pub mod stats;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(assembly_line::router())
        .merge(assembly_store::router())
        .merge(fabrication::router())
        .merge(kanban::router())
        .merge(stats::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
