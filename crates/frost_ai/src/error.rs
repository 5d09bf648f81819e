//! Error types for the AI crate

use frost_core::EntityId;
use thiserror::Error;

/// AI errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    /// A required collaborator was not supplied when building an agent
    #[error("Entity {entity} is missing required collaborator: {collaborator}")]
    MissingCollaborator {
        entity: EntityId,
        collaborator: &'static str,
    },

    /// A configuration value is out of range
    #[error("Invalid AI configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for AI operations
pub type Result<T> = std::result::Result<T, AiError>;
