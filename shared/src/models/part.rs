//! Part Models
//!
//! Part inventory ledger, per-part store staging and the fabrication
//! shop-floor scheduling record.

use serde::{Deserialize, Serialize};

/// Part entity — on-hand quantity plus the quantity one assembly
/// cycle consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Part {
    pub id: i64,
    pub part_number: String,
    pub part_name: String,
    /// On-hand quantity; never negative
    pub quantity: i64,
    /// Required quantity per assembly cycle
    pub quantity_req: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Aggregate inventory readiness, display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartCompleteness {
    Complete,
    Incomplete,
}

/// Part store staging status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PartStoreStatus {
    #[default]
    Idle,
    OrderToFabrication,
    Receive,
}

/// Per-part staging record bridging store and fabrication.
/// Created lazily the first time an order references the part;
/// outlives individual orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PartStore {
    pub id: i64,
    pub part_id: i64,
    pub stock: i64,
    pub status: PartStoreStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Part store row joined with part identity (list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PartStoreWithPart {
    pub id: i64,
    pub part_id: i64,
    pub stock: i64,
    pub status: PartStoreStatus,
    pub part_number: String,
    pub part_name: String,
    pub created_at: i64,
}

/// Shop floor scheduling status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ShopFloorStatus {
    #[default]
    Pending,
    InProgress,
    Finish,
}

impl ShopFloorStatus {
    /// Linear pending → in_progress → finish; no skipping, no reverse
    pub fn can_advance_to(self, target: ShopFloorStatus) -> bool {
        matches!(
            (self, target),
            (ShopFloorStatus::Pending, ShopFloorStatus::InProgress)
                | (ShopFloorStatus::InProgress, ShopFloorStatus::Finish)
        )
    }
}

/// Per-order scheduling record, fabrication station only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PartShopFloor {
    pub id: i64,
    pub order_id: i64,
    pub part_id: i64,
    /// Planned window, Unix millis; both must be set before the
    /// record may move to in_progress
    pub plan_start: Option<i64>,
    pub plan_finish: Option<i64>,
    pub actual_start: Option<i64>,
    pub actual_finish: Option<i64>,
    pub status: ShopFloorStatus,
    pub station: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl PartShopFloor {
    /// plan_finish - actual_finish, only once both are stamped.
    /// Negative means the order finished late.
    pub fn time_remaining(&self) -> Option<i64> {
        match (self.plan_finish, self.actual_finish) {
            (Some(plan), Some(actual)) => Some(plan - actual),
            _ => None,
        }
    }
}

/// Shop floor row joined with part identity (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopFloorView {
    #[serde(flatten)]
    pub shop_floor: PartShopFloor,
    pub part_number: String,
    pub part_name: String,
    pub time_remaining: Option<i64>,
}

/// Named assembly build target (withdrawal flow)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Component {
    pub id: i64,
    pub name: String,
}

/// Component → part mapping, recorded on the first assembly run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PartComponent {
    pub id: i64,
    pub component_id: i64,
    pub part_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_floor_transitions_are_linear() {
        use ShopFloorStatus::*;
        assert!(Pending.can_advance_to(InProgress));
        assert!(InProgress.can_advance_to(Finish));
        // No skipping, no reverse, no self-loop
        assert!(!Pending.can_advance_to(Finish));
        assert!(!InProgress.can_advance_to(Pending));
        assert!(!Finish.can_advance_to(InProgress));
        assert!(!Finish.can_advance_to(Finish));
    }

    #[test]
    fn time_remaining_requires_both_stamps() {
        let mut sf = PartShopFloor {
            id: 1,
            order_id: 1,
            part_id: 1,
            plan_start: Some(0),
            plan_finish: Some(10_000),
            actual_start: Some(0),
            actual_finish: None,
            status: ShopFloorStatus::InProgress,
            station: "shop_floor".into(),
            created_at: 0,
            updated_at: None,
        };
        assert_eq!(sf.time_remaining(), None);

        sf.actual_finish = Some(12_000);
        assert_eq!(sf.time_remaining(), Some(-2_000)); // late
    }
}
