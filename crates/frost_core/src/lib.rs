//! # frost_core - Frostbite Core
//!
//! Core primitives shared by every Frostbite crate:
//! - **Entity ids**: cheap copyable handles with a generator per level session
//! - **Capabilities**: the narrow contracts entities expose to the rest of the
//!   simulation (reset, pause, animation triggers, screen overlay)
//!
//! Capabilities are plain traits. A system that needs "everything that can be
//! reset" holds a registry of trait objects instead of scanning the scene.

pub mod capability;
pub mod error;
pub mod id;

pub use capability::*;
pub use error::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::capability::{AnimationParams, AnimationRecorder, AnimationSink, Pausable, Resettable, ScreenOverlay};
    pub use crate::error::{CoreError, Result};
    pub use crate::id::{EntityId, IdGenerator};
}
