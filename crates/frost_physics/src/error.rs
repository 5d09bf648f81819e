//! Error types for the physics system

use frost_core::EntityId;
use thiserror::Error;

/// Physics system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Entity has no collider in the world
    #[error("Entity {0} has no collider")]
    EntityNotInPhysics(EntityId),

    /// Parenting would create a cycle
    #[error("Cannot parent {child} under {parent}: would create a cycle")]
    HierarchyCycle { child: EntityId, parent: EntityId },

    /// Shape creation failed
    #[error("Failed to create collision shape: {0}")]
    ShapeCreationFailed(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
