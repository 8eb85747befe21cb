//! Stats API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/stats", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/progress-track", get(handler::progress_track))
        .route("/production-progress", get(handler::production_progress))
        .route("/delay-ontime", get(handler::delay_ontime))
}
