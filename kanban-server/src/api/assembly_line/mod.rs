//! Assembly Line API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/assembly-line", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/parts", get(handler::list_parts))
        .route("/parts/{id}", get(handler::get_part))
        .route("/parts/quantity", put(handler::update_part_quantity))
        .route("/orders", post(handler::create_order))
        .route("/orders/{id}", delete(handler::delete_order))
        .route("/assemble", post(handler::assemble))
        .route("/kanbans", get(handler::kanban_board))
}
