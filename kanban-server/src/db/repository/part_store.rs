//! Part Store Repository
//!
//! One staging row per part, created lazily and kept across order
//! cycles.

use super::{RepoError, RepoResult};
use shared::models::{PartStore, PartStoreStatus, PartStoreWithPart};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, part_id, stock, status, created_at, updated_at";

pub async fn find_all_with_part(pool: &SqlitePool) -> RepoResult<Vec<PartStoreWithPart>> {
    let rows = sqlx::query_as::<_, PartStoreWithPart>(
        "SELECT ps.id, ps.part_id, ps.stock, ps.status, p.part_number, p.part_name, ps.created_at \
         FROM part_store ps \
         INNER JOIN part p ON p.id = ps.part_id \
         ORDER BY ps.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PartStore>> {
    let row =
        sqlx::query_as::<_, PartStore>(&format!("SELECT {COLUMNS} FROM part_store WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<PartStore>> {
    let row =
        sqlx::query_as::<_, PartStore>(&format!("SELECT {COLUMNS} FROM part_store WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(row)
}

pub async fn find_by_part_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    part_id: i64,
) -> RepoResult<Option<PartStore>> {
    let row = sqlx::query_as::<_, PartStore>(&format!(
        "SELECT {COLUMNS} FROM part_store WHERE part_id = ?"
    ))
    .bind(part_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

/// Idempotent lazy creation: insert `{stock: 0, status: idle}` on
/// first reference, otherwise return the existing row unchanged
pub async fn ensure_exists(
    tx: &mut Transaction<'_, Sqlite>,
    part_id: i64,
) -> RepoResult<PartStore> {
    if let Some(existing) = find_by_part_id_tx(tx, part_id).await? {
        return Ok(existing);
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO part_store (id, part_id, stock, status, created_at) VALUES (?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(part_id)
    .bind(PartStoreStatus::Idle)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    find_by_part_id_tx(tx, part_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create part store row".into()))
}

/// Set staging status for a part (awaiting fabrication / receive)
pub async fn set_status_by_part(
    tx: &mut Transaction<'_, Sqlite>,
    part_id: i64,
    status: PartStoreStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE part_store SET status = ?, updated_at = ? WHERE part_id = ?")
        .bind(status)
        .bind(now)
        .bind(part_id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Part store row for part {part_id} not found"
        )));
    }
    Ok(())
}

/// Add received stock and flip status in one update
pub async fn receive_stock(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    added: i64,
    status: PartStoreStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE part_store SET stock = stock + ?, status = ?, updated_at = ? WHERE id = ?",
    )
    .bind(added)
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Part store {id} not found")));
    }
    Ok(())
}
