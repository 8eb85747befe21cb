//! Assembly Store API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/assembly-store", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list_orders))
        .route("/orders/status", post(handler::update_order_status))
        .route("/parts", get(handler::list_part_stores))
        .route("/parts/status", put(handler::update_part_store_status))
}
