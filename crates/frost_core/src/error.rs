//! Error types for the core library

use crate::id::EntityId;
use thiserror::Error;

/// The core error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// An entity could not restore its level-start state
    #[error("Reset failed for entity {entity}: {reason}")]
    ResetFailed { entity: EntityId, reason: String },

    /// An entity was already borrowed when a broadcast reached it
    #[error("Entity is busy and cannot be mutated right now")]
    EntityBusy,

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

impl CoreError {
    /// Shorthand for a reset failure
    pub fn reset_failed(entity: EntityId, reason: impl Into<String>) -> Self {
        Self::ResetFailed {
            entity,
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;
