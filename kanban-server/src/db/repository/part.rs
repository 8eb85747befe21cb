//! Part Repository

use super::{RepoError, RepoResult};
use shared::models::{Component, Part, PartComponent};
use sqlx::{Sqlite, SqlitePool, Transaction};

const PART_COLUMNS: &str =
    "id, part_number, part_name, quantity, quantity_req, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Part>> {
    let parts = sqlx::query_as::<_, Part>(&format!(
        "SELECT {PART_COLUMNS} FROM part ORDER BY part_number"
    ))
    .fetch_all(pool)
    .await?;
    Ok(parts)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Part>> {
    let part = sqlx::query_as::<_, Part>(&format!("SELECT {PART_COLUMNS} FROM part WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(part)
}

pub async fn find_by_number(pool: &SqlitePool, part_number: &str) -> RepoResult<Option<Part>> {
    let part = sqlx::query_as::<_, Part>(&format!(
        "SELECT {PART_COLUMNS} FROM part WHERE part_number = ?"
    ))
    .bind(part_number)
    .fetch_optional(pool)
    .await?;
    Ok(part)
}

pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<Part>> {
    let part = sqlx::query_as::<_, Part>(&format!("SELECT {PART_COLUMNS} FROM part WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(part)
}

/// All parts, inside a transaction (consumption pre-validation)
pub async fn find_all_tx(tx: &mut Transaction<'_, Sqlite>) -> RepoResult<Vec<Part>> {
    let parts = sqlx::query_as::<_, Part>(&format!(
        "SELECT {PART_COLUMNS} FROM part ORDER BY part_number"
    ))
    .fetch_all(&mut **tx)
    .await?;
    Ok(parts)
}

/// Direct quantity set (manual stock correction)
pub async fn set_quantity(pool: &SqlitePool, id: i64, quantity: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE part SET quantity = ?, updated_at = ? WHERE id = ?")
        .bind(quantity)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Part {id} not found")));
    }
    Ok(())
}

/// Overwrite quantity inside a transaction; callers have already
/// validated the new value is non-negative
pub async fn update_quantity_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE part SET quantity = ?, updated_at = ? WHERE id = ?")
        .bind(quantity)
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Part {id} not found")));
    }
    Ok(())
}

/// Increment on-hand quantity (delivery confirmation)
pub async fn replenish_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    amount: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE part SET quantity = quantity + ?, updated_at = ? WHERE id = ?")
            .bind(amount)
            .bind(now)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Part {id} not found")));
    }
    Ok(())
}

// ── Components ─────────────────────────────────────────────────────

pub async fn find_component(
    tx: &mut Transaction<'_, Sqlite>,
    component_id: i64,
) -> RepoResult<Option<Component>> {
    let component =
        sqlx::query_as::<_, Component>("SELECT id, name FROM component WHERE id = ?")
            .bind(component_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(component)
}

pub async fn insert_component(
    tx: &mut Transaction<'_, Sqlite>,
    component_id: i64,
    name: &str,
) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO component (id, name) VALUES (?, ?)")
        .bind(component_id)
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn component_mapping_exists(
    tx: &mut Transaction<'_, Sqlite>,
    component_id: i64,
) -> RepoResult<bool> {
    let mapping = sqlx::query_as::<_, PartComponent>(
        "SELECT id, component_id, part_id FROM part_component WHERE component_id = ? LIMIT 1",
    )
    .bind(component_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(mapping.is_some())
}

pub async fn insert_component_mapping(
    tx: &mut Transaction<'_, Sqlite>,
    component_id: i64,
    part_id: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO part_component (id, component_id, part_id) VALUES (?, ?, ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(component_id)
    .bind(part_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
