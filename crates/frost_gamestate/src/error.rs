//! Error types for level sessions

use frost_ai::AiError;
use frost_physics::PhysicsError;
use frost_survival::SurvivalError;
use thiserror::Error;

/// Game state errors
#[derive(Debug, Error)]
pub enum GameStateError {
    /// Level file could not be read
    #[error("Failed to read level config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Level file is not valid TOML for a level
    #[error("Failed to parse level config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Level values out of range
    #[error("Invalid level config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Survival(#[from] SurvivalError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Result type for game state operations
pub type Result<T> = std::result::Result<T, GameStateError>;
