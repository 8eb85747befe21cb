//! Order Models
//!
//! An order is a logical unit of work tied to one station. It is
//! always paired with exactly one station-specific child row
//! (store / fabrication / assembly line) and, for store and
//! fabrication flows, with one kanban card.

use serde::{Deserialize, Serialize};

/// Order aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub station_id: i64,
    pub created_by: i64,
    pub created_at: i64,
}

/// Store order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStoreStatus {
    #[default]
    Pending,
    Production,
    Deliver,
    Finish,
}

/// Assembly store order child row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderStore {
    pub id: i64,
    pub order_id: i64,
    pub part_id: i64,
    pub quantity: i64,
    pub status: OrderStoreStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Store order joined with part identity and staged stock (list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderStoreWithPart {
    pub id: i64,
    pub order_id: i64,
    pub part_id: i64,
    pub quantity: i64,
    pub status: OrderStoreStatus,
    pub part_number: String,
    pub part_name: String,
    pub stock: Option<i64>,
    pub created_at: i64,
}

/// Fabrication order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderFabricationStatus {
    #[default]
    Pending,
    Deliver,
    Finish,
}

/// Fabrication order child row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderFabrication {
    pub id: i64,
    pub order_id: i64,
    pub part_id: i64,
    pub quantity: i64,
    pub status: OrderFabricationStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Fabrication order joined with part identity (list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderFabricationWithPart {
    pub id: i64,
    pub order_id: i64,
    pub part_id: i64,
    pub quantity: i64,
    pub status: OrderFabricationStatus,
    pub part_number: String,
    pub part_name: String,
    pub created_at: i64,
}

/// Assembly line withdrawal order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderLineStatus {
    #[default]
    Progress,
    Finish,
}

/// Assembly line order child row (component withdrawal)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub component_id: i64,
    pub quantity: i64,
    pub status: OrderLineStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Delivery receipt status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum DeliverStatus {
    #[default]
    Deliver,
    Finish,
}

/// Receipt row created when fabrication delivers back to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliverOrderFabrication {
    pub id: i64,
    pub order_fab_id: i64,
    pub part_id: i64,
    pub status: DeliverStatus,
    pub created_at: i64,
}

// ── Request payloads ────────────────────────────────────────────────

/// Create store order payload (assembly line requesting parts)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOrderCreate {
    pub part_number: String,
    pub quantity: i64,
    /// Host used to build the QR confirmation URL
    pub request_host: String,
}

/// Advance store order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOrderStatusUpdate {
    pub id: i64,
    pub status: OrderStoreStatus,
    /// Host used to build the QR confirmation URL when the advance
    /// opens a fresh kanban
    #[serde(default)]
    pub request_host: String,
}

/// Receive delivered parts payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartStoreStatusUpdate {
    pub id: i64,
    pub status: super::PartStoreStatus,
}

/// Start assembling a component payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAssembly {
    pub component_id: i64,
    pub request_host: String,
}

/// Shop floor plan payload; dates as `YYYY-MM-DDTHH:MM[:SS]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopFloorPlanUpdate {
    pub id: i64,
    pub plan_start: String,
    pub plan_finish: String,
}

/// Shop floor status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopFloorStatusUpdate {
    pub id: i64,
    pub status: super::ShopFloorStatus,
}

/// Set part quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartQuantityUpdate {
    pub id: i64,
    pub quantity: i64,
}
