//! Kanban Models (看板卡)
//!
//! A kanban card represents one unit of in-flight work. Each card
//! wraps exactly one order and carries a QR payload for physical
//! tracking. Card status must mirror the downstream record it
//! shadows (shop floor for store/fabrication stations, order line
//! for the assembly line); the sync rules live in the server's
//! `flow` module, the pure status tables live here.

use serde::{Deserialize, Serialize};

use super::ShopFloorStatus;

/// Physical card id printed on production kanbans
pub const CARD_PRODUCTION: &str = "RYIN001";
/// Physical card id printed on withdrawal kanbans
pub const CARD_WITHDRAWAL: &str = "RYIN002";

/// Kanban kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum KanbanType {
    /// Replenishment: store orders parts from fabrication
    #[default]
    Production,
    /// Consumption: assembly line withdraws store-held parts
    Withdrawal,
}

/// Kanban card status; linear queue → progress → done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum KanbanStatus {
    #[default]
    Queue,
    Progress,
    Done,
}

impl KanbanStatus {
    /// The only legal next status, if any
    pub fn next(self) -> Option<KanbanStatus> {
        match self {
            KanbanStatus::Queue => Some(KanbanStatus::Progress),
            KanbanStatus::Progress => Some(KanbanStatus::Done),
            KanbanStatus::Done => None,
        }
    }

    /// Shop-floor status this card status must be paired with
    /// (stations other than the assembly line)
    pub fn required_shop_floor(self) -> ShopFloorStatus {
        match self {
            KanbanStatus::Queue => ShopFloorStatus::Pending,
            KanbanStatus::Progress => ShopFloorStatus::InProgress,
            KanbanStatus::Done => ShopFloorStatus::Finish,
        }
    }
}

/// Kanban card row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Kanban {
    /// Opaque token, also the QR payload target
    pub id: String,
    pub card_id: String,
    #[serde(rename = "type")]
    pub kanban_type: KanbanType,
    pub status: KanbanStatus,
    /// Opaque QR payload (base64); rendering is the client's job
    pub qr_code: String,
    pub order_id: i64,
    pub station_id: i64,
    pub order_date: i64,
    pub plan_start: i64,
    pub finish_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Withdrawal routing row, present only for withdrawal kanbans
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct KanbanWithdrawal {
    pub id: i64,
    pub kanban_id: String,
    pub prev_station_id: i64,
    pub next_station_id: i64,
}

/// Withdrawal routing with resolved station names (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalDetail {
    pub prev_station_id: i64,
    pub prev_station_name: String,
    pub next_station_id: i64,
    pub next_station_name: String,
}

/// Enriched kanban read (GET /kanban/:id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanDetail {
    #[serde(flatten)]
    pub kanban: Kanban,
    pub part_number: Option<String>,
    pub part_name: Option<String>,
    pub quantity: Option<i64>,
    pub station_name: String,
    /// Shop-floor plan window, non-assembly-line production cards only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_floor_plan_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_floor_plan_finish: Option<i64>,
    /// Present only for withdrawal cards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal: Option<WithdrawalDetail>,
}

/// Flat card summary for station boards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct KanbanCard {
    pub id: String,
    pub card_id: String,
    #[serde(rename = "type")]
    pub kanban_type: KanbanType,
    pub status: KanbanStatus,
    pub order_id: i64,
    pub plan_start: i64,
    pub part_number: Option<String>,
    pub part_name: String,
    pub quantity: i64,
    pub station_name: String,
}

/// Assembly line board grouped by card status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KanbanBoard {
    pub queue: Vec<KanbanCard>,
    pub progress: Vec<KanbanCard>,
    pub done: Vec<KanbanCard>,
}

impl KanbanBoard {
    /// Assembly line board columns: production cards waiting in queue
    /// feed the queue column, withdrawal cards feed the progress and
    /// done columns
    pub fn group(cards: Vec<KanbanCard>) -> Self {
        let mut board = KanbanBoard::default();
        for card in cards {
            match (card.kanban_type, card.status) {
                (KanbanType::Production, KanbanStatus::Queue) => board.queue.push(card),
                (KanbanType::Withdrawal, KanbanStatus::Progress) => board.progress.push(card),
                (KanbanType::Withdrawal, KanbanStatus::Done) => board.done.push(card),
                _ => {}
            }
        }
        board
    }
}

/// Confirm (advance) kanban payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanConfirm {
    pub id: String,
    pub status: KanbanStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_chain_is_linear_and_terminal() {
        assert_eq!(KanbanStatus::Queue.next(), Some(KanbanStatus::Progress));
        assert_eq!(KanbanStatus::Progress.next(), Some(KanbanStatus::Done));
        assert_eq!(KanbanStatus::Done.next(), None);
    }

    fn card(kanban_type: KanbanType, status: KanbanStatus) -> KanbanCard {
        KanbanCard {
            id: "token".to_string(),
            card_id: CARD_PRODUCTION.to_string(),
            kanban_type,
            status,
            order_id: 1,
            plan_start: 0,
            part_number: None,
            part_name: "Part".to_string(),
            quantity: 1,
            station_name: "Assembly Line".to_string(),
        }
    }

    #[test]
    fn board_grouping_drops_cards_between_columns() {
        let board = KanbanBoard::group(vec![
            card(KanbanType::Production, KanbanStatus::Queue),
            card(KanbanType::Production, KanbanStatus::Progress),
            card(KanbanType::Withdrawal, KanbanStatus::Progress),
            card(KanbanType::Withdrawal, KanbanStatus::Done),
        ]);
        assert_eq!(board.queue.len(), 1);
        assert_eq!(board.progress.len(), 1);
        assert_eq!(board.done.len(), 1);
    }

    #[test]
    fn sync_table_matches_shop_floor() {
        assert_eq!(
            KanbanStatus::Queue.required_shop_floor(),
            ShopFloorStatus::Pending
        );
        assert_eq!(
            KanbanStatus::Progress.required_shop_floor(),
            ShopFloorStatus::InProgress
        );
        assert_eq!(
            KanbanStatus::Done.required_shop_floor(),
            ShopFloorStatus::Finish
        );
    }
}
