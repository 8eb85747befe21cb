use super::*;
use crate::db::DbService;
use crate::db::repository::{kanban as kanban_repo, order, part, part_store, shop_floor};
use shared::models::*;
use sqlx::SqlitePool;

mod test_kanban;
mod test_orders;
mod test_stats;

const HOST: &str = "http://localhost:3000";

async fn setup() -> DbService {
    DbService::new_in_memory().await.unwrap()
}

async fn insert_part(pool: &SqlitePool, number: &str, quantity: i64, quantity_req: i64) -> i64 {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO part (id, part_number, part_name, quantity, quantity_req, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(number)
    .bind(format!("Part {number}"))
    .bind(quantity)
    .bind(quantity_req)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await
    .unwrap();
    id
}

async fn part_quantity(pool: &SqlitePool, id: i64) -> i64 {
    part::find_by_id(pool, id).await.unwrap().unwrap().quantity
}

/// Store order + fabrication order, kanban on the fabrication side
/// in queue, shop floor pending
async fn setup_fabrication(db: &DbService, part_number: &str, quantity: i64) -> Kanban {
    insert_part(&db.pool, part_number, 100, 0).await;
    let store_kanban = orchestrate::create_store_order(
        &db.pool,
        &StoreOrderCreate {
            part_number: part_number.to_string(),
            quantity,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap();
    let store = order::find_order_store_with_part(&db.pool)
        .await
        .unwrap()
        .into_iter()
        .find(|o| o.order_id == store_kanban.order_id)
        .unwrap();
    orchestrate::advance_to_fabrication(&db.pool, store.id, 1, HOST)
        .await
        .unwrap()
}

async fn set_plan_raw(pool: &SqlitePool, order_id: i64, start: i64, finish: i64) {
    let record = shop_floor::find_by_order_id(pool, order_id)
        .await
        .unwrap()
        .unwrap();
    shop_floor::set_plan(pool, record.id, start, finish).await.unwrap();
}
