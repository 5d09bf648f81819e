//! Frost GameState - Level sessions, respawn and reset
//!
//! This crate ties the perception, threat and survival pieces into one
//! level session and owns the recovery paths.
//!
//! # Features
//!
//! - Respawn sequence as an explicit phase-and-timer state machine
//! - Level-wide reset / pause broadcast over a registry of weak references
//! - Level session context driving the fixed and frame clocks
//! - TOML level configuration with environment overrides
//!
//! # Example
//!
//! ```ignore
//! use frost_gamestate::prelude::*;
//!
//! let config = LevelConfig::load();
//! let mut session = LevelSession::new(config)?;
//! session.fixed_update(1.0 / 50.0);
//! session.frame_update(1.0 / 60.0);
//! ```

pub mod config;
pub mod error;
pub mod level;
pub mod overlay;
pub mod reset;
pub mod respawn;

pub mod prelude {
    pub use crate::config::{
        LevelConfig, PlayerConfig, RespawnTimings, RouteWaypoint, SentryPlacement, SimulationConfig,
        ThreatPlacement, WallConfig,
    };
    pub use crate::error::{GameStateError, Result};
    pub use crate::level::{LevelSession, SessionStats};
    pub use crate::overlay::FadeOverlay;
    pub use crate::reset::{BroadcastReport, ResetRegistry};
    pub use crate::respawn::{RespawnCommand, RespawnPhase, RespawnSequencer};
}

pub use prelude::*;
