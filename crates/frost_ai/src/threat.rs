//! Threat agents (zombies)
//!
//! Lifecycle:
//!
//! ```text
//! Idle --target entered detector--> Alerted --> Pursuing
//! any live state --freeze_and_die--> Frozen --> Dead
//! any live state --stop_behaviour--> Paused --start_behaviour--> Pursuing | Idle
//! any state --on_reset--> Idle (at spawn)
//! ```
//!
//! `Frozen` only lasts inside `freeze_and_die`. Dead only leaves through
//! `on_reset`.

use crate::detector::{DetectorEvent, DetectorVolume};
use crate::error::{AiError, Result};
use crate::navigation::NavigationAgent;
use crate::perception::ProbeTarget;
use frost_core::{AnimationSink, EntityId, Pausable, Resettable, Result as CoreResult};
use frost_math::{Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Animation trigger fired when an agent acquires a target
pub const ANIM_ALERT: &str = "Alert";
/// Animation trigger fired once when an agent freezes
pub const ANIM_DIE: &str = "Die";
/// Animation bool tracking whether the agent is walking
pub const ANIM_WALKING: &str = "Walking";
/// Animation float carrying the agent's speed
pub const ANIM_SPEED: &str = "Speed";

/// Threat agent state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatState {
    /// Waiting for a target
    Idle,
    /// Target just acquired
    Alerted,
    /// Chasing the target
    Pursuing,
    /// Halted by a level-wide pause
    Paused,
    /// Caught in a sentry's sight, about to die
    Frozen,
    /// Permanently inert until reset
    Dead,
}

impl ThreatState {
    /// Whether the agent can still act
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Idle | Self::Alerted | Self::Pursuing)
    }
}

/// Threat agent tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// Movement speed handed to the navigation agent
    pub speed: f32,
    /// Radius of the detector volume
    pub detector_radius: f32,
    /// Distance at which the agent touches the player
    pub contact_radius: f32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            detector_radius: 8.0,
            contact_radius: 1.0,
        }
    }
}

/// Events emitted by a threat agent update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatEvent {
    /// A target entered the detector and the agent started pursuing
    Alerted { agent: EntityId, target: EntityId },
    /// The agent touched the player; the player must respawn
    PlayerContact { agent: EntityId },
}

/// Builder for [`ThreatAgent`]
///
/// Navigation, detector and animator are required.
pub struct ThreatAgentBuilder {
    entity: EntityId,
    spawn: Transform,
    config: ThreatConfig,
    navigation: Option<Box<dyn NavigationAgent>>,
    detector: Option<DetectorVolume>,
    animator: Option<Box<dyn AnimationSink>>,
}

impl ThreatAgentBuilder {
    /// Start building an agent
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            spawn: Transform::IDENTITY,
            config: ThreatConfig::default(),
            navigation: None,
            detector: None,
            animator: None,
        }
    }

    /// Set the spawn transform
    pub fn spawn(mut self, spawn: Transform) -> Self {
        self.spawn = spawn;
        self
    }

    /// Set tuning
    pub fn config(mut self, config: ThreatConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the navigation agent
    pub fn navigation(mut self, navigation: Box<dyn NavigationAgent>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    /// Set the detector volume
    pub fn detector(mut self, detector: DetectorVolume) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Set the animator
    pub fn animator(mut self, animator: Box<dyn AnimationSink>) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<ThreatAgent> {
        let entity = self.entity;
        let missing = |collaborator| {
            log::error!("Threat agent {} has no {}", entity, collaborator);
            AiError::MissingCollaborator { entity, collaborator }
        };

        let mut navigation = self.navigation.ok_or_else(|| missing("navigation agent"))?;
        let detector = self.detector.ok_or_else(|| missing("detector"))?;
        let animator = self.animator.ok_or_else(|| missing("animator"))?;

        navigation.warp(self.spawn.position);

        Ok(ThreatAgent {
            entity,
            spawn: self.spawn,
            transform: self.spawn,
            config: self.config,
            state: ThreatState::Idle,
            target: None,
            navigation,
            detector,
            animator,
            hit_detection: true,
            resume_target: None,
        })
    }
}

/// Roaming threat with a pursue / freeze / reset lifecycle
pub struct ThreatAgent {
    entity: EntityId,
    spawn: Transform,
    transform: Transform,
    config: ThreatConfig,
    state: ThreatState,
    target: Option<EntityId>,
    navigation: Box<dyn NavigationAgent>,
    detector: DetectorVolume,
    animator: Box<dyn AnimationSink>,
    hit_detection: bool,
    /// Target held when paused, picked up again on resume
    resume_target: Option<EntityId>,
}

impl ThreatAgent {
    /// Agent entity
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Current state
    pub fn state(&self) -> ThreatState {
        self.state
    }

    /// Current target
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Current transform (position follows navigation, yaw follows movement)
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.navigation.position()
    }

    /// Spawn transform
    pub fn spawn(&self) -> &Transform {
        &self.spawn
    }

    /// Navigation agent
    pub fn navigation(&self) -> &dyn NavigationAgent {
        self.navigation.as_ref()
    }

    /// Whether touching the player counts
    pub fn hit_detection(&self) -> bool {
        self.hit_detection
    }

    /// Whether a sentry may still freeze this agent
    pub fn is_freezable(&self) -> bool {
        !matches!(self.state, ThreatState::Frozen | ThreatState::Dead)
    }

    /// Target-acquired signal. Returns `true` if the agent started pursuing.
    pub fn on_target_acquired(&mut self, target: EntityId) -> bool {
        if self.state != ThreatState::Idle {
            return false;
        }
        self.target = Some(target);
        self.state = ThreatState::Alerted;
        self.animator.set_trigger(ANIM_ALERT);
        log::info!("Threat {} alerted by {}", self.entity, target);

        self.state = ThreatState::Pursuing;
        self.navigation.resume();
        true
    }

    /// Target-lost signal. The agent keeps chasing a target it has acquired.
    pub fn on_target_lost(&mut self, target: EntityId) {
        log::debug!("Threat {}: {} left detector range", self.entity, target);
    }

    /// Advance the agent by one fixed tick.
    ///
    /// `player` is the entity the detector watches and the agent chases.
    pub fn update(&mut self, dt: f32, player: &ProbeTarget) -> Vec<ThreatEvent> {
        let mut events = Vec::new();

        match self.state {
            ThreatState::Frozen | ThreatState::Dead => return events,
            ThreatState::Paused => {}
            ThreatState::Idle | ThreatState::Alerted | ThreatState::Pursuing => {
                let center = self.navigation.position();
                for event in self.detector.update(center, &[(player.entity, player.position)]) {
                    match event {
                        DetectorEvent::Entered(target) => {
                            if self.on_target_acquired(target) {
                                events.push(ThreatEvent::Alerted {
                                    agent: self.entity,
                                    target,
                                });
                            }
                        }
                        DetectorEvent::Exited(target) => self.on_target_lost(target),
                    }
                }

                if self.state == ThreatState::Pursuing
                    && self.target == Some(player.entity)
                    && self.navigation.is_enabled()
                {
                    self.navigation.set_destination(player.position);
                }
                self.navigation.update(dt);
                self.sync_transform();
            }
        }

        if self.touches(player.position) && self.on_player_contact() {
            events.push(ThreatEvent::PlayerContact { agent: self.entity });
        }

        events
    }

    fn touches(&self, position: Vec3) -> bool {
        let mut offset = position - self.navigation.position();
        offset.y = 0.0;
        offset.length() <= self.config.contact_radius
    }

    fn sync_transform(&mut self) {
        let position = self.navigation.position();
        let velocity = self.navigation.velocity();
        self.transform.position = position;
        if velocity.length_squared() > 1e-6 {
            self.transform.look_at_flat(position + velocity);
        }
        self.animator.set_bool(ANIM_WALKING, velocity.length_squared() > 1e-6);
        self.animator.set_float(ANIM_SPEED, velocity.length());
    }

    /// The agent touched the player. Returns `true` if the player must respawn.
    pub fn on_player_contact(&mut self) -> bool {
        if self.state == ThreatState::Dead || !self.hit_detection {
            return false;
        }
        self.navigation.stop();
        log::info!("Threat {} caught the player", self.entity);
        true
    }

    /// Freeze in place and die. Returns `false` if already dead.
    pub fn freeze_and_die(&mut self) -> bool {
        if !self.is_freezable() {
            return false;
        }
        self.state = ThreatState::Frozen;
        self.navigation.stop();
        self.navigation.reset_path();
        self.hit_detection = false;
        self.target = None;
        self.resume_target = None;
        self.animator.set_bool(ANIM_WALKING, false);
        self.animator.set_trigger(ANIM_DIE);
        self.state = ThreatState::Dead;
        log::info!("Threat {} frozen and dead", self.entity);
        true
    }
}

impl Resettable for ThreatAgent {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn on_reset(&mut self) -> CoreResult<()> {
        self.navigation.set_enabled(true);
        self.navigation.reset_path();
        self.navigation.resume();
        let warped = self.navigation.warp(self.spawn.position);

        self.target = None;
        self.resume_target = None;
        self.transform = self.spawn;
        self.transform.position = self.navigation.position();
        self.hit_detection = true;
        self.detector.clear();
        self.animator.set_bool(ANIM_WALKING, false);
        self.state = ThreatState::Idle;

        if !warped {
            return Err(frost_core::CoreError::reset_failed(
                self.entity,
                "navigation agent refused to warp to spawn",
            ));
        }
        log::debug!("Threat {} reset to spawn", self.entity);
        Ok(())
    }
}

impl Pausable for ThreatAgent {
    fn stop_behaviour(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.navigation.stop();
        self.navigation.reset_path();
        self.resume_target = self.target.take();
        self.animator.set_bool(ANIM_WALKING, false);
        self.state = ThreatState::Paused;
        log::debug!("Threat {} paused", self.entity);
        true
    }

    fn start_behaviour(&mut self) -> bool {
        if self.state != ThreatState::Paused {
            return false;
        }
        self.navigation.resume();
        // a chase interrupted by the pause carries on without a fresh alert
        self.target = self.resume_target.take();
        self.state = if self.target.is_some() {
            ThreatState::Pursuing
        } else {
            ThreatState::Idle
        };
        log::debug!("Threat {} resumed as {:?}", self.entity, self.state);
        true
    }
}
