//! Order Repository
//!
//! The order aggregate and its station-specific children. Every
//! multi-row effect (create, advance, deliver, delete) runs inside a
//! caller-owned transaction.

use super::{RepoError, RepoResult};
use shared::models::{
    DeliverOrderFabrication, DeliverStatus, Order, OrderFabrication, OrderFabricationStatus,
    OrderLineStatus, OrderStore, OrderStoreStatus, OrderStoreWithPart, OrderFabricationWithPart,
};
use sqlx::{Sqlite, SqlitePool, Transaction};

// ── orders ─────────────────────────────────────────────────────────

pub async fn insert_order(
    tx: &mut Transaction<'_, Sqlite>,
    station_id: i64,
    created_by: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO orders (id, station_id, created_by, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(station_id)
        .bind(created_by)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(id)
}

pub async fn find_order_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, station_id, created_by, created_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn find_order_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, station_id, created_by, created_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(order)
}

/// Move the order to another station
pub async fn set_order_station(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    station_id: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET station_id = ? WHERE id = ?")
        .bind(station_id)
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    Ok(())
}

// ── order_store ────────────────────────────────────────────────────

const ORDER_STORE_COLUMNS: &str =
    "id, order_id, part_id, quantity, status, created_at, updated_at";

pub async fn insert_order_store(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    part_id: i64,
    quantity: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO order_store (id, order_id, part_id, quantity, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(part_id)
    .bind(quantity)
    .bind(OrderStoreStatus::Pending)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn find_order_store_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderStore>> {
    let row = sqlx::query_as::<_, OrderStore>(&format!(
        "SELECT {ORDER_STORE_COLUMNS} FROM order_store WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_order_store_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<OrderStore>> {
    let row = sqlx::query_as::<_, OrderStore>(&format!(
        "SELECT {ORDER_STORE_COLUMNS} FROM order_store WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn find_order_store_by_part_tx(
    tx: &mut Transaction<'_, Sqlite>,
    part_id: i64,
) -> RepoResult<Vec<OrderStore>> {
    let rows = sqlx::query_as::<_, OrderStore>(&format!(
        "SELECT {ORDER_STORE_COLUMNS} FROM order_store WHERE part_id = ?"
    ))
    .bind(part_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

pub async fn find_all_order_store(pool: &SqlitePool) -> RepoResult<Vec<OrderStore>> {
    let rows = sqlx::query_as::<_, OrderStore>(&format!(
        "SELECT {ORDER_STORE_COLUMNS} FROM order_store ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Store orders joined with part identity and staged stock
pub async fn find_order_store_with_part(pool: &SqlitePool) -> RepoResult<Vec<OrderStoreWithPart>> {
    let rows = sqlx::query_as::<_, OrderStoreWithPart>(
        "SELECT os.id, os.order_id, os.part_id, os.quantity, os.status, \
                p.part_number, p.part_name, ps.stock, os.created_at \
         FROM order_store os \
         INNER JOIN part p ON p.id = os.part_id \
         LEFT JOIN part_store ps ON ps.part_id = os.part_id \
         ORDER BY os.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_order_store_status(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    status: OrderStoreStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE order_store SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store order {id} not found")));
    }
    Ok(())
}

// ── order_fabrication ──────────────────────────────────────────────

const ORDER_FAB_COLUMNS: &str =
    "id, order_id, part_id, quantity, status, created_at, updated_at";

pub async fn insert_order_fabrication(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    part_id: i64,
    quantity: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO order_fabrication (id, order_id, part_id, quantity, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(part_id)
    .bind(quantity)
    .bind(OrderFabricationStatus::Pending)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn find_order_fabrication_by_id(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<OrderFabrication>> {
    let row = sqlx::query_as::<_, OrderFabrication>(&format!(
        "SELECT {ORDER_FAB_COLUMNS} FROM order_fabrication WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_order_fabrication_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<OrderFabrication>> {
    let row = sqlx::query_as::<_, OrderFabrication>(&format!(
        "SELECT {ORDER_FAB_COLUMNS} FROM order_fabrication WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn find_all_order_fabrication(pool: &SqlitePool) -> RepoResult<Vec<OrderFabrication>> {
    let rows = sqlx::query_as::<_, OrderFabrication>(&format!(
        "SELECT {ORDER_FAB_COLUMNS} FROM order_fabrication ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_order_fabrication_with_part(
    pool: &SqlitePool,
) -> RepoResult<Vec<OrderFabricationWithPart>> {
    let rows = sqlx::query_as::<_, OrderFabricationWithPart>(
        "SELECT ofab.id, ofab.order_id, ofab.part_id, ofab.quantity, ofab.status, \
                p.part_number, p.part_name, ofab.created_at \
         FROM order_fabrication ofab \
         INNER JOIN part p ON p.id = ofab.part_id \
         ORDER BY ofab.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_order_fabrication_status(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    status: OrderFabricationStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE order_fabrication SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Fabrication order {id} not found"
        )));
    }
    Ok(())
}

/// Flip status by parent order id; returns affected row count so the
/// caller can treat zero rows as missing-order
pub async fn set_order_fabrication_status_by_order(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    status: OrderFabricationStatus,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE order_fabrication SET status = ?, updated_at = ? WHERE order_id = ?")
            .bind(status)
            .bind(now)
            .bind(order_id)
            .execute(&mut **tx)
            .await?;
    Ok(rows.rows_affected())
}

// ── order_line ─────────────────────────────────────────────────────

pub async fn insert_order_line(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    component_id: i64,
    quantity: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO order_line (id, order_id, component_id, quantity, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(component_id)
    .bind(quantity)
    .bind(OrderLineStatus::Progress)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

// ── deliver_order_fabrication ──────────────────────────────────────

pub async fn insert_deliver_order_fabrication(
    tx: &mut Transaction<'_, Sqlite>,
    order_fab_id: i64,
    part_id: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO deliver_order_fabrication (id, order_fab_id, part_id, status, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_fab_id)
    .bind(part_id)
    .bind(DeliverStatus::Deliver)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// Outstanding (undelivered-to-stock) receipts for a part
pub async fn find_open_deliveries_by_part(
    tx: &mut Transaction<'_, Sqlite>,
    part_id: i64,
) -> RepoResult<Vec<DeliverOrderFabrication>> {
    let rows = sqlx::query_as::<_, DeliverOrderFabrication>(
        "SELECT id, order_fab_id, part_id, status, created_at \
         FROM deliver_order_fabrication WHERE status = ? AND part_id = ?",
    )
    .bind(DeliverStatus::Deliver)
    .bind(part_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

/// Quantity of a fabrication order backing a receipt
pub async fn find_order_fabrication_quantity(
    tx: &mut Transaction<'_, Sqlite>,
    order_fab_id: i64,
) -> RepoResult<Option<i64>> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT quantity FROM order_fabrication WHERE id = ?")
            .bind(order_fab_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(row.map(|(q,)| q))
}

pub async fn finish_deliveries(
    tx: &mut Transaction<'_, Sqlite>,
    receipt_ids: &[i64],
) -> RepoResult<()> {
    for id in receipt_ids {
        sqlx::query("UPDATE deliver_order_fabrication SET status = ? WHERE id = ?")
            .bind(DeliverStatus::Finish)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

// ── cascade delete ─────────────────────────────────────────────────

/// Delete an order and every dependent row. Lock checks are done by
/// the flow layer before calling this.
pub async fn delete_order_cascade(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
) -> RepoResult<()> {
    sqlx::query(
        "DELETE FROM kanban_withdrawal WHERE kanban_id IN (SELECT id FROM kanban WHERE order_id = ?)",
    )
    .bind(order_id)
    .execute(&mut **tx)
    .await?;
    sqlx::query("DELETE FROM kanban WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM order_line WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM order_store WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query(
        "DELETE FROM deliver_order_fabrication WHERE order_fab_id IN \
         (SELECT id FROM order_fabrication WHERE order_id = ?)",
    )
    .bind(order_id)
    .execute(&mut **tx)
    .await?;
    sqlx::query("DELETE FROM order_fabrication WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM part_shop_floor WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    Ok(())
}
