//! Flow Module (状态机核心)
//!
//! The order / kanban / shop-floor state machines. Every entry point
//! takes the pool, opens one transaction, performs all side effects,
//! then commits; nothing here leaves a half-applied step visible.
//!
//! - [`ledger`] - part inventory arithmetic
//! - [`station`] - per-station advance side effects
//! - [`confirm`] - kanban card advance state machine
//! - [`orchestrate`] - order lifecycle operations
//! - [`stats`] - board aggregations

pub mod confirm;
pub mod ledger;
pub mod orchestrate;
pub mod station;
pub mod stats;

#[cfg(test)]
mod tests;

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// Flow errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Kanban not found: {0}")]
    KanbanNotFound(String),

    #[error("Shop floor record not found: {0}")]
    ShopFloorNotFound(i64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Plan start must be before plan finish")]
    InvalidRange,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Insufficient stock for part {part_number}: have {have}, need {need}")]
    InsufficientStock {
        part_number: String,
        have: i64,
        need: i64,
    },

    #[error("Order {0} is locked by shop floor progress")]
    OrderLocked(i64),

    /// Card status and the shadowed record disagree
    #[error("Kanban out of sync: {0}")]
    OutOfSync(String),

    /// Requested status equals the current one
    #[error("Kanban already in requested status")]
    NoOp,

    /// Requested status is not the next in the chain
    #[error("Invalid target status: only the next status is reachable")]
    InvalidTarget,

    #[error("Shop floor plan required before starting")]
    PlanRequired,

    #[error("Shop floor must be in progress before finishing")]
    NotInProgress,

    #[error("Kanban already finished")]
    Terminal,

    /// Infrastructure fault on a valid request (token/QR generation)
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::PartNotFound(msg) => AppError::not_found(format!("Part not found: {msg}")),
            FlowError::OrderNotFound(id) => AppError::not_found(format!("Order not found: {id}")),
            FlowError::KanbanNotFound(id) => {
                AppError::not_found(format!("Kanban not found: {id}"))
            }
            FlowError::ShopFloorNotFound(id) => {
                AppError::not_found(format!("Shop floor record not found: {id}"))
            }
            FlowError::InvalidQuantity(_)
            | FlowError::InvalidDate(_)
            | FlowError::InvalidRange
            | FlowError::InvalidRequest(_) => AppError::validation(err.to_string()),
            FlowError::InvalidTransition(_)
            | FlowError::OutOfSync(_)
            | FlowError::NoOp
            | FlowError::InvalidTarget
            | FlowError::PlanRequired
            | FlowError::NotInProgress
            | FlowError::Terminal => AppError::state_transition(err.to_string()),
            FlowError::InsufficientStock { .. } | FlowError::OrderLocked(_) => {
                AppError::business_rule(err.to_string())
            }
            FlowError::Internal(msg) => AppError::internal(msg),
            FlowError::Repo(e) => e.into(),
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;

#[cfg(test)]
mod error_mapping_tests {
    use super::*;

    #[test]
    fn infrastructure_faults_surface_as_internal_errors() {
        let app: AppError = FlowError::Internal("qr".into()).into();
        assert!(matches!(app, AppError::Internal(_)));
        let app: AppError = FlowError::InvalidRequest("bad".into()).into();
        assert!(matches!(app, AppError::Validation(_)));
    }
}
