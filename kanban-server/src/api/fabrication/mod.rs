//! Fabrication API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/fabrication", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list_orders))
        .route("/orders/deliver/{order_id}", get(handler::deliver_order))
        .route("/shop-floors", get(handler::list_shop_floors))
        .route("/shop-floors/{id}", get(handler::get_shop_floor))
        .route("/shop-floors/plan", put(handler::set_plan))
        .route("/shop-floors/status", put(handler::update_status))
        .route("/kanbans", get(handler::list_kanbans))
}
