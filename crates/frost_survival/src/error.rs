//! Error types for the survival crate

use frost_core::EntityId;
use thiserror::Error;

/// Survival errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurvivalError {
    /// The fixed tick ran without a movement state to read activity from
    #[error("Player {entity} has no movement state; temperature cannot be integrated")]
    MissingMovementState { entity: EntityId },

    /// Temperature bounds or rates make no sense
    #[error("Invalid temperature configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for survival operations
pub type Result<T> = std::result::Result<T, SurvivalError>;
