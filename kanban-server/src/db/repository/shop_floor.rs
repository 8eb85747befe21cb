//! Shop Floor Repository
//!
//! Per-order scheduling rows for fabrication-station orders.

use super::{RepoError, RepoResult};
use shared::models::{PartShopFloor, ShopFloorStatus, ShopFloorView};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, order_id, part_id, plan_start, plan_finish, actual_start, \
                       actual_finish, status, station, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PartShopFloor>> {
    let row = sqlx::query_as::<_, PartShopFloor>(&format!(
        "SELECT {COLUMNS} FROM part_shop_floor WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<PartShopFloor>> {
    let row = sqlx::query_as::<_, PartShopFloor>(&format!(
        "SELECT {COLUMNS} FROM part_shop_floor WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn find_by_order_id(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Option<PartShopFloor>> {
    let row = sqlx::query_as::<_, PartShopFloor>(&format!(
        "SELECT {COLUMNS} FROM part_shop_floor WHERE order_id = ?"
    ))
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_order_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
) -> RepoResult<Option<PartShopFloor>> {
    let row = sqlx::query_as::<_, PartShopFloor>(&format!(
        "SELECT {COLUMNS} FROM part_shop_floor WHERE order_id = ?"
    ))
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

/// All scheduling rows joined with part identity, newest first
pub async fn find_all_views(pool: &SqlitePool) -> RepoResult<Vec<ShopFloorView>> {
    let rows = sqlx::query_as::<_, PartShopFloorWithPart>(&format!(
        "SELECT sf.id, sf.order_id, sf.part_id, sf.plan_start, sf.plan_finish, \
                sf.actual_start, sf.actual_finish, sf.status, sf.station, \
                sf.created_at, sf.updated_at, p.part_number, p.part_name \
         FROM part_shop_floor sf \
         INNER JOIN part p ON p.id = sf.part_id \
         ORDER BY sf.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find_view_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ShopFloorView>> {
    let row = sqlx::query_as::<_, PartShopFloorWithPart>(
        "SELECT sf.id, sf.order_id, sf.part_id, sf.plan_start, sf.plan_finish, \
                sf.actual_start, sf.actual_finish, sf.status, sf.station, \
                sf.created_at, sf.updated_at, p.part_number, p.part_name \
         FROM part_shop_floor sf \
         INNER JOIN part p ON p.id = sf.part_id \
         WHERE sf.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

/// Every scheduling row (stats queries)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PartShopFloor>> {
    let rows = sqlx::query_as::<_, PartShopFloor>(&format!(
        "SELECT {COLUMNS} FROM part_shop_floor ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Rows with a given status (stats queries)
pub async fn find_by_status(
    pool: &SqlitePool,
    status: ShopFloorStatus,
) -> RepoResult<Vec<PartShopFloor>> {
    let rows = sqlx::query_as::<_, PartShopFloor>(&format!(
        "SELECT {COLUMNS} FROM part_shop_floor WHERE status = ? ORDER BY created_at DESC"
    ))
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    part_id: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO part_shop_floor (id, order_id, part_id, status, station, created_at) \
         VALUES (?, ?, ?, ?, 'shop_floor', ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(part_id)
    .bind(ShopFloorStatus::Pending)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// Store the planned window; millis validated by the caller
pub async fn set_plan(
    pool: &SqlitePool,
    id: i64,
    plan_start: i64,
    plan_finish: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE part_shop_floor SET plan_start = ?, plan_finish = ?, updated_at = ? WHERE id = ?",
    )
    .bind(plan_start)
    .bind(plan_finish)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Shop floor {id} not found")));
    }
    Ok(())
}

/// Flip status; stamps actual_start / actual_finish depending on the
/// target. Transition legality is checked by the flow layer.
pub async fn set_status(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    status: ShopFloorStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = match status {
        ShopFloorStatus::InProgress => {
            sqlx::query(
                "UPDATE part_shop_floor SET status = ?, actual_start = ?, updated_at = ? \
                 WHERE id = ?",
            )
            .bind(status)
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(&mut **tx)
            .await?
        }
        ShopFloorStatus::Finish => {
            sqlx::query(
                "UPDATE part_shop_floor SET status = ?, actual_finish = ?, updated_at = ? \
                 WHERE id = ?",
            )
            .bind(status)
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(&mut **tx)
            .await?
        }
        ShopFloorStatus::Pending => {
            sqlx::query("UPDATE part_shop_floor SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status)
                .bind(now)
                .bind(id)
                .execute(&mut **tx)
                .await?
        }
    };
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Shop floor {id} not found")));
    }
    Ok(())
}

pub async fn delete_by_order_id(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
) -> RepoResult<()> {
    sqlx::query("DELETE FROM part_shop_floor WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Row shape for the part join; flattened into [`ShopFloorView`]
#[derive(sqlx::FromRow)]
struct PartShopFloorWithPart {
    id: i64,
    order_id: i64,
    part_id: i64,
    plan_start: Option<i64>,
    plan_finish: Option<i64>,
    actual_start: Option<i64>,
    actual_finish: Option<i64>,
    status: ShopFloorStatus,
    station: String,
    created_at: i64,
    updated_at: Option<i64>,
    part_number: String,
    part_name: String,
}

impl From<PartShopFloorWithPart> for ShopFloorView {
    fn from(row: PartShopFloorWithPart) -> Self {
        let shop_floor = PartShopFloor {
            id: row.id,
            order_id: row.order_id,
            part_id: row.part_id,
            plan_start: row.plan_start,
            plan_finish: row.plan_finish,
            actual_start: row.actual_start,
            actual_finish: row.actual_finish,
            status: row.status,
            station: row.station,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        let time_remaining = shop_floor.time_remaining();
        ShopFloorView {
            shop_floor,
            part_number: row.part_number,
            part_name: row.part_name,
            time_remaining,
        }
    }
}
