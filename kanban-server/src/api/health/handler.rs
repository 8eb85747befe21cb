//! Health API Handlers

use axum::Json;
use serde::Serialize;

use crate::utils::{AppResponse, ok};

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: i64,
}

/// GET /health - 健康检查
pub async fn health() -> Json<AppResponse<Health>> {
    ok(Health {
        status: "ok",
        timestamp: shared::util::now_millis(),
    })
}
