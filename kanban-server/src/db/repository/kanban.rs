//! Kanban Repository (看板)
//!
//! Card rows, withdrawal routing rows and the enriched read views
//! used by the station boards.

use super::{RepoError, RepoResult};
use shared::models::{
    Kanban, KanbanCard, KanbanDetail, KanbanStatus, KanbanType, KanbanWithdrawal, StationId,
    WithdrawalDetail,
};
use sqlx::{Sqlite, SqlitePool, Transaction};

const KANBAN_COLUMNS: &str = "id, card_id, kanban_type, status, qr_code, order_id, station_id, \
                              order_date, plan_start, finish_date, created_at, updated_at";

pub async fn insert(tx: &mut Transaction<'_, Sqlite>, kanban: &Kanban) -> RepoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO kanban ({KANBAN_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&kanban.id)
    .bind(&kanban.card_id)
    .bind(kanban.kanban_type)
    .bind(kanban.status)
    .bind(&kanban.qr_code)
    .bind(kanban.order_id)
    .bind(kanban.station_id)
    .bind(kanban.order_date)
    .bind(kanban.plan_start)
    .bind(kanban.finish_date)
    .bind(kanban.created_at)
    .bind(kanban.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn insert_withdrawal(
    tx: &mut Transaction<'_, Sqlite>,
    kanban_id: &str,
    prev_station_id: i64,
    next_station_id: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO kanban_withdrawal (id, kanban_id, prev_station_id, next_station_id) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(kanban_id)
    .bind(prev_station_id)
    .bind(next_station_id)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Kanban>> {
    let row = sqlx::query_as::<_, Kanban>(&format!(
        "SELECT {KANBAN_COLUMNS} FROM kanban WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> RepoResult<Option<Kanban>> {
    let row = sqlx::query_as::<_, Kanban>(&format!(
        "SELECT {KANBAN_COLUMNS} FROM kanban WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn find_withdrawal(
    pool: &SqlitePool,
    kanban_id: &str,
) -> RepoResult<Option<KanbanWithdrawal>> {
    let row = sqlx::query_as::<_, KanbanWithdrawal>(
        "SELECT id, kanban_id, prev_station_id, next_station_id \
         FROM kanban_withdrawal WHERE kanban_id = ?",
    )
    .bind(kanban_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Flip card status; `done` also stamps the finish date
pub async fn set_status(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
    status: KanbanStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = match status {
        KanbanStatus::Done => {
            sqlx::query(
                "UPDATE kanban SET status = ?, finish_date = ?, updated_at = ? WHERE id = ?",
            )
            .bind(status)
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(&mut **tx)
            .await?
        }
        _ => sqlx::query("UPDATE kanban SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(&mut **tx)
            .await?,
    };
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Kanban {id} not found")));
    }
    Ok(())
}

// ── board / listing views ──────────────────────────────────────────

/// Card summary with part identity resolved through whichever child
/// row the order carries. Withdrawal cards surface the component name
/// in `part_name`.
const CARD_SELECT: &str = "SELECT k.id, k.card_id, k.kanban_type, k.status, k.order_id, \
            k.plan_start, \
            p.part_number AS part_number, \
            COALESCE(p.part_name, c.name) AS part_name, \
            COALESCE(os.quantity, ofab.quantity, ol.quantity) AS quantity, \
            s.name AS station_name \
     FROM kanban k \
     INNER JOIN station s ON s.id = k.station_id \
     LEFT JOIN order_store os ON os.order_id = k.order_id \
     LEFT JOIN order_fabrication ofab ON ofab.order_id = k.order_id \
     LEFT JOIN order_line ol ON ol.order_id = k.order_id \
     LEFT JOIN component c ON c.id = ol.component_id \
     LEFT JOIN part p ON p.id = COALESCE(os.part_id, ofab.part_id)";

pub async fn find_all_cards(pool: &SqlitePool) -> RepoResult<Vec<KanbanCard>> {
    let rows = sqlx::query_as::<_, KanbanCard>(&format!(
        "{CARD_SELECT} ORDER BY k.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_cards_by_station(
    pool: &SqlitePool,
    station_id: i64,
) -> RepoResult<Vec<KanbanCard>> {
    let rows = sqlx::query_as::<_, KanbanCard>(&format!(
        "{CARD_SELECT} WHERE k.station_id = ? ORDER BY k.created_at DESC"
    ))
    .bind(station_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ── enriched detail ────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct ChildPart {
    part_number: String,
    part_name: String,
    quantity: i64,
}

/// Full card read: part identity, station name, plan window for
/// non-assembly-line production cards, routing for withdrawal cards.
pub async fn find_detail(pool: &SqlitePool, id: &str) -> RepoResult<Option<KanbanDetail>> {
    let Some(kanban) = find_by_id(pool, id).await? else {
        return Ok(None);
    };

    let station_name: (String,) = sqlx::query_as("SELECT name FROM station WHERE id = ?")
        .bind(kanban.station_id)
        .fetch_one(pool)
        .await?;

    let mut detail = KanbanDetail {
        part_number: None,
        part_name: None,
        quantity: None,
        station_name: station_name.0,
        shop_floor_plan_start: None,
        shop_floor_plan_finish: None,
        withdrawal: None,
        kanban,
    };

    match detail.kanban.kanban_type {
        KanbanType::Production => {
            let child = sqlx::query_as::<_, ChildPart>(
                "SELECT p.part_number, p.part_name, os.quantity \
                 FROM order_store os INNER JOIN part p ON p.id = os.part_id \
                 WHERE os.order_id = ?",
            )
            .bind(detail.kanban.order_id)
            .fetch_optional(pool)
            .await?;
            let child = match child {
                Some(c) => Some(c),
                None => {
                    sqlx::query_as::<_, ChildPart>(
                        "SELECT p.part_number, p.part_name, ofab.quantity \
                         FROM order_fabrication ofab \
                         INNER JOIN part p ON p.id = ofab.part_id \
                         WHERE ofab.order_id = ?",
                    )
                    .bind(detail.kanban.order_id)
                    .fetch_optional(pool)
                    .await?
                }
            };
            if let Some(c) = child {
                detail.part_number = Some(c.part_number);
                detail.part_name = Some(c.part_name);
                detail.quantity = Some(c.quantity);
            }
            if detail.kanban.station_id != StationId::AssemblyLine.id() {
                let plan: Option<(Option<i64>, Option<i64>)> = sqlx::query_as(
                    "SELECT plan_start, plan_finish FROM part_shop_floor WHERE order_id = ?",
                )
                .bind(detail.kanban.order_id)
                .fetch_optional(pool)
                .await?;
                if let Some((start, finish)) = plan {
                    detail.shop_floor_plan_start = start;
                    detail.shop_floor_plan_finish = finish;
                }
            }
        }
        KanbanType::Withdrawal => {
            let line: Option<(String, i64)> = sqlx::query_as(
                "SELECT c.name, ol.quantity FROM order_line ol \
                 INNER JOIN component c ON c.id = ol.component_id \
                 WHERE ol.order_id = ?",
            )
            .bind(detail.kanban.order_id)
            .fetch_optional(pool)
            .await?;
            if let Some((name, quantity)) = line {
                detail.part_name = Some(name);
                detail.quantity = Some(quantity);
            }
            if let Some(w) = find_withdrawal(pool, &detail.kanban.id).await? {
                let prev: (String,) = sqlx::query_as("SELECT name FROM station WHERE id = ?")
                    .bind(w.prev_station_id)
                    .fetch_one(pool)
                    .await?;
                let next: (String,) = sqlx::query_as("SELECT name FROM station WHERE id = ?")
                    .bind(w.next_station_id)
                    .fetch_one(pool)
                    .await?;
                detail.withdrawal = Some(WithdrawalDetail {
                    prev_station_id: w.prev_station_id,
                    prev_station_name: prev.0,
                    next_station_id: w.next_station_id,
                    next_station_name: next.0,
                });
            }
        }
    }

    Ok(Some(detail))
}
