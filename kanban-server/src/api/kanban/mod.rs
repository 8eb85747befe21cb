//! Kanban API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/kanban", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/confirm", put(handler::confirm))
        .route("/{id}", get(handler::get_by_id))
}
