//! Shared types for the kanban tracking system
//!
//! Data models and utility types used by the server and by API
//! clients. Models are plain serde structs; DB row derives are
//! feature-gated behind `db` so frontends can depend on this crate
//! without pulling in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Kanban, KanbanStatus, KanbanType, Order, OrderFabrication, OrderStore, Part, PartShopFloor,
    PartStore, ShopFloorStatus, StationId,
};
