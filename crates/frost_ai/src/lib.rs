//! Frost AI - Perception and threat behaviour
//!
//! This crate decides who can see whom and what the roaming threats do
//! about it.
//!
//! # Features
//!
//! - Line-of-sight probe (distance, view cone, occlusion ray)
//! - Detection sentries with edge-triggered visibility tracking
//! - Threat agents (zombies) with a pursue / freeze / reset lifecycle
//! - Navigation agent contract plus a straight-line headless agent
//! - Spherical detector volumes with enter/exit edges
//!
//! # Example
//!
//! ```ignore
//! use frost_ai::prelude::*;
//!
//! let probe = VisibilityProbe::new(ProbeConfig::default());
//! let query = SightQuery::new(origin, forward, 15.0, 45.0);
//! if probe.is_visible(&physics, &query, &ProbeTarget::new(player, player_pos)) {
//!     // ...
//! }
//! ```

pub mod detector;
pub mod error;
pub mod navigation;
pub mod perception;
pub mod sentry;
pub mod threat;

pub mod prelude {
    pub use crate::detector::{DetectorEvent, DetectorVolume};
    pub use crate::error::{AiError, Result};
    pub use crate::navigation::{DirectNavAgent, NavigationAgent};
    pub use crate::perception::{ProbeConfig, ProbeTarget, SightQuery, Visibility, VisibilityProbe};
    pub use crate::sentry::{DetectionSentry, SentryConfig, SentryEvent, VisibilityCounter};
    pub use crate::threat::{ThreatAgent, ThreatAgentBuilder, ThreatConfig, ThreatEvent, ThreatState};
}

pub use prelude::*;
