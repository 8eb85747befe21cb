//! Data models
//!
//! Shared between kanban-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY) except kanban cards,
//! which use opaque string tokens so they can be printed as QR codes.

pub mod kanban;
pub mod order;
pub mod part;
pub mod station;

// Re-exports
pub use kanban::*;
pub use order::*;
pub use part::*;
pub use station::*;
