//! Per-entity update errors.
//!
//! Systems return these from their per-entity functions; the caller logs the
//! failure and moves on to the next entity.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The entity was despawned or lacks a component the system reads.
    #[error("component access failed: {0}")]
    Component(#[from] hecs::ComponentError),
    /// The entity was despawned or does not match the system's query.
    #[error("entity query failed: {0}")]
    Query(#[from] hecs::QueryOneError),
}
