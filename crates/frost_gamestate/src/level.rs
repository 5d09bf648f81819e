//! Level session
//!
//! One [`LevelSession`] exists per loaded level. It owns the physics world,
//! the player, the sentries and the threat agents, and it is the only thing
//! that may trigger a respawn or broadcast a reset. Systems reach each other
//! through the session rather than through any global.

use crate::config::{LevelConfig, SentryPlacement, ThreatPlacement};
use crate::error::Result;
use crate::reset::{BroadcastReport, ResetRegistry};
use crate::respawn::{RespawnCommand, RespawnSequencer};
use frost_ai::{
    DetectionSentry, DetectorVolume, DirectNavAgent, ProbeTarget, SentryEvent, ThreatAgent, ThreatAgentBuilder,
    ThreatEvent,
};
use frost_core::{AnimationParams, AnimationSink, EntityId, IdGenerator, Pausable, ScreenOverlay};
use frost_math::{Transform, Vec3};
use frost_physics::{ColliderDesc, ColliderShape, CollisionLayer, PhysicsWorld};
use frost_survival::{MovementState, PlayerBody};
use std::cell::RefCell;
use std::rc::Rc;

/// Counters collected over a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Respawn sequences started
    pub respawns: u32,
    /// Reset broadcasts issued
    pub resets: u32,
    /// Threat agents frozen to death by sentries
    pub threat_deaths: u32,
    /// Respawns started by a threat touching the player
    pub contacts: u32,
    /// Fixed ticks where the player's temperature could not be integrated
    pub rejected_player_ticks: u32,
}

/// Explicit context for one loaded level
pub struct LevelSession {
    config: LevelConfig,
    ids: IdGenerator,
    physics: PhysicsWorld,
    player: Rc<RefCell<PlayerBody>>,
    sentries: Vec<Rc<RefCell<DetectionSentry>>>,
    threats: Vec<Rc<RefCell<ThreatAgent>>>,
    respawn: RespawnSequencer,
    registry: ResetRegistry,
    overlay: Option<Box<dyn ScreenOverlay>>,
    stats: SessionStats,
    time: f64,
}

impl LevelSession {
    /// Build a level from its configuration
    pub fn new(config: LevelConfig) -> Result<Self> {
        config.validate()?;

        let ids = IdGenerator::new();
        let mut physics = PhysicsWorld::new();

        for wall in &config.walls {
            let [hx, hy, hz] = wall.half_extents;
            physics.add_collider(
                ids.next(),
                wall.position,
                ColliderDesc::new(ColliderShape::cuboid(hx, hy, hz)).with_layer(CollisionLayer::ENVIRONMENT),
            )?;
        }

        let spawn = config.player.spawn_transform();
        let player_id = ids.next();
        let player = Rc::new(RefCell::new(PlayerBody::new(player_id, spawn, config.temperature)?));
        physics.add_collider(
            player_id,
            spawn.position,
            ColliderDesc::new(ColliderShape::capsule(config.player.half_height, config.player.radius))
                .with_offset(Vec3::new(0.0, config.player.half_height + config.player.radius, 0.0))
                .with_layer(CollisionLayer::PLAYER),
        )?;

        let mut registry = ResetRegistry::new();
        registry.register_resettable(&player);

        let respawn = RespawnSequencer::new(config.respawn, spawn);

        let mut session = Self {
            config,
            ids,
            physics,
            player,
            sentries: Vec::new(),
            threats: Vec::new(),
            respawn,
            registry,
            overlay: None,
            stats: SessionStats::default(),
            time: 0.0,
        };

        let sentries = session.config.sentries.clone();
        for placement in &sentries {
            session.add_sentry(placement)?;
        }

        let threats = session.config.threats.clone();
        for placement in &threats {
            let animator: Box<dyn AnimationSink> = Box::new(AnimationParams::new());
            if let Err(e) = session.spawn_threat(placement, Some(animator)) {
                log::error!("Skipping threat at {:?}: {}", placement.position, e);
            }
        }

        log::info!(
            "Level '{}' ready: {} sentries, {} threats",
            session.config.name,
            session.sentries.len(),
            session.threats.len()
        );
        Ok(session)
    }

    /// Attach a fade overlay
    pub fn with_overlay(mut self, overlay: Box<dyn ScreenOverlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Place a sentry
    pub fn add_sentry(&mut self, placement: &SentryPlacement) -> Result<EntityId> {
        let id = self.ids.next();
        let sentry = DetectionSentry::new(id, placement.transform(), placement.resolve(&self.config.detection))
            .with_probe(self.config.probe);
        self.physics.add_collider(
            id,
            placement.position,
            ColliderDesc::new(ColliderShape::sphere(0.4)).with_layer(CollisionLayer::SENTRIES),
        )?;

        let sentry = Rc::new(RefCell::new(sentry));
        self.registry.register_resettable(&sentry);
        self.sentries.push(sentry);
        log::debug!("Sentry {} placed at {:?}", id, placement.position);
        Ok(id)
    }

    /// Tear down a sentry, releasing any sighting it holds
    pub fn remove_sentry(&mut self, id: EntityId) -> bool {
        let Some(index) = self.sentries.iter().position(|s| s.borrow().entity() == id) else {
            return false;
        };
        let sentry = self.sentries.remove(index);
        sentry.borrow_mut().teardown(self.player.borrow_mut().visibility_mut());
        self.physics.remove_entity(id);
        true
    }

    /// Spawn a threat agent. A missing animator makes the agent unusable and
    /// the call fails without touching the level.
    pub fn spawn_threat(
        &mut self,
        placement: &ThreatPlacement,
        animator: Option<Box<dyn AnimationSink>>,
    ) -> Result<EntityId> {
        let id = self.ids.next();
        let spawn = placement.transform();
        let threat_config = self.config.threat;

        let mut builder = ThreatAgentBuilder::new(id)
            .spawn(spawn)
            .config(threat_config)
            .navigation(Box::new(DirectNavAgent::new(spawn.position, threat_config.speed)))
            .detector(DetectorVolume::new(threat_config.detector_radius));
        if let Some(animator) = animator {
            builder = builder.animator(animator);
        }
        let agent = builder.build()?;

        self.physics.add_collider(
            id,
            spawn.position,
            ColliderDesc::new(ColliderShape::capsule(0.5, 0.35))
                .with_offset(Vec3::new(0.0, 0.85, 0.0))
                .with_layer(CollisionLayer::THREATS),
        )?;

        let agent = Rc::new(RefCell::new(agent));
        self.registry.register_resettable(&agent);
        self.registry.register_pausable(id, &agent);
        self.threats.push(agent);
        log::debug!("Threat {} spawned at {:?}", id, spawn.position);
        Ok(id)
    }

    // ==================== Clocks ====================

    /// Fixed clock: temperature integration and movement
    pub fn fixed_update(&mut self, dt: f32) {
        self.time += dt as f64;

        if let Err(e) = self.player.borrow_mut().fixed_update(dt) {
            self.stats.rejected_player_ticks += 1;
            log::error!("Player tick rejected: {}", e);
        }

        let player = self.player_target();
        let mut events = Vec::new();
        for threat in &self.threats {
            let mut threat = threat.borrow_mut();
            events.extend(threat.update(dt, &player));
            self.physics.set_entity_position(threat.entity(), threat.position());
        }

        for event in events {
            match event {
                ThreatEvent::Alerted { agent, target } => {
                    log::debug!("Threat {} now chasing {}", agent, target);
                }
                ThreatEvent::PlayerContact { agent } => {
                    if self.request_respawn() {
                        self.stats.contacts += 1;
                        log::info!("Player caught by threat {}", agent);
                    }
                }
            }
        }
    }

    /// Frame clock: perception and the respawn sequence
    pub fn frame_update(&mut self, dt: f32) {
        let player = self.player_target();
        let temperature = self.player.borrow().temperature();
        let threats: Vec<ProbeTarget> = self
            .threats
            .iter()
            .filter_map(|t| {
                let t = t.borrow();
                t.is_freezable().then(|| ProbeTarget::new(t.entity(), t.position()))
            })
            .collect();

        let mut events = Vec::new();
        for sentry in &self.sentries {
            let mut player_body = self.player.borrow_mut();
            events.extend(sentry.borrow_mut().update(
                dt,
                &self.physics,
                &player,
                temperature,
                player_body.visibility_mut(),
                &threats,
            ));
        }

        for event in events {
            match event {
                SentryEvent::RespawnRequested { sentry } => {
                    if self.request_respawn() {
                        log::info!("Player detected by sentry {} at {:.2}", sentry, temperature);
                    }
                }
                SentryEvent::FreezeThreat { threat, .. } => {
                    if self.freeze_threat(threat) {
                        self.stats.threat_deaths += 1;
                    }
                }
                SentryEvent::PlayerSpotted { .. } | SentryEvent::PlayerLost { .. } => {}
            }
        }

        let commands = self.respawn.advance(dt);
        self.apply_commands(commands);
    }

    fn player_target(&self) -> ProbeTarget {
        let player = self.player.borrow();
        ProbeTarget::new(player.entity(), player.position())
    }

    fn freeze_threat(&mut self, id: EntityId) -> bool {
        self.threats
            .iter()
            .find(|t| t.borrow().entity() == id)
            .map(|t| t.borrow_mut().freeze_and_die())
            .unwrap_or(false)
    }

    // ==================== Recovery ====================

    /// Start the respawn sequence. Returns `false` if one is already running.
    pub fn request_respawn(&mut self) -> bool {
        if !self.respawn.trigger() {
            return false;
        }
        self.stats.respawns += 1;
        let commands = self.respawn.advance(0.0);
        self.apply_commands(commands);
        true
    }

    fn apply_commands(&mut self, commands: Vec<RespawnCommand>) {
        for command in commands {
            match command {
                RespawnCommand::LockInput => {
                    self.player.borrow_mut().lock_input();
                }
                RespawnCommand::ZeroMotion => self.player.borrow_mut().zero_motion(),
                RespawnCommand::PauseThreats => {
                    self.registry.broadcast_pause();
                }
                RespawnCommand::ResumeThreats => {
                    self.registry.broadcast_resume();
                }
                RespawnCommand::SetOverlayOpacity(opacity) => match self.overlay.as_mut() {
                    Some(overlay) => overlay.set_opacity(opacity),
                    None => log::trace!("No overlay; skipping fade to {:.2}", opacity),
                },
                RespawnCommand::BroadcastReset => {
                    self.reset_level();
                }
                RespawnCommand::Teleport(transform) => {
                    let id = {
                        let mut player = self.player.borrow_mut();
                        player.teleport(transform);
                        player.entity()
                    };
                    self.physics.set_entity_position(id, transform.position);
                }
                RespawnCommand::UnlockInput => {
                    self.player.borrow_mut().unlock_input();
                    log::info!("Respawn complete");
                }
            }
        }
    }

    /// Reset every resettable entity in the level
    pub fn reset_level(&mut self) -> BroadcastReport {
        self.stats.resets += 1;
        let report = self.registry.broadcast_reset();
        for threat in &self.threats {
            let threat = threat.borrow();
            self.physics.set_entity_position(threat.entity(), threat.position());
        }
        report
    }

    /// Pause every threat agent
    pub fn pause(&mut self) -> BroadcastReport {
        self.registry.broadcast_pause()
    }

    /// Resume every paused threat agent
    pub fn resume(&mut self) -> BroadcastReport {
        self.registry.broadcast_resume()
    }

    // ==================== Player input ====================

    /// Feed one fixed tick of player input.
    ///
    /// `movement` of `None` means the input layer reported nothing. Motion
    /// is dropped while input is locked.
    pub fn drive_player(&mut self, displacement: Vec3, movement: Option<MovementState>, cooling: bool, dt: f32) {
        let (id, position) = {
            let mut player = self.player.borrow_mut();
            player.set_movement(movement);
            player.set_cooling(cooling);
            player.apply_motion(displacement, dt);
            (player.entity(), player.position())
        };
        self.physics.set_entity_position(id, position);
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn player(&self) -> &Rc<RefCell<PlayerBody>> {
        &self.player
    }

    pub fn sentries(&self) -> &[Rc<RefCell<DetectionSentry>>] {
        &self.sentries
    }

    pub fn threats(&self) -> &[Rc<RefCell<ThreatAgent>>] {
        &self.threats
    }

    pub fn respawn(&self) -> &RespawnSequencer {
        &self.respawn
    }

    pub fn overlay(&self) -> Option<&dyn ScreenOverlay> {
        self.overlay.as_deref()
    }

    pub fn registry(&self) -> &ResetRegistry {
        &self.registry
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Simulated seconds on the fixed clock
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Tear the level down, releasing sentry sightings, and return its stats
    pub fn unload(mut self) -> SessionStats {
        for sentry in self.sentries.drain(..) {
            sentry.borrow_mut().teardown(self.player.borrow_mut().visibility_mut());
        }
        for threat in &self.threats {
            threat.borrow_mut().stop_behaviour();
        }
        log::info!("Level '{}' unloaded", self.config.name);
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WallConfig;

    fn open_level() -> LevelConfig {
        LevelConfig {
            sentries: vec![SentryPlacement::new(Vec3::new(0.0, 1.6, -10.0), 180.0)],
            ..Default::default()
        }
    }

    #[test]
    fn test_session_builds_entities() {
        let mut config = open_level();
        config.threats.push(ThreatPlacement {
            position: Vec3::new(20.0, 0.0, 0.0),
            yaw_deg: 0.0,
        });
        config.walls.push(WallConfig {
            position: Vec3::new(0.0, 1.0, -5.0),
            half_extents: [1.0, 1.0, 0.2],
        });

        let session = LevelSession::new(config).unwrap();
        assert_eq!(session.sentries().len(), 1);
        assert_eq!(session.threats().len(), 1);
        // player + sentry + threat
        assert_eq!(session.registry().resettable_count(), 3);
        assert_eq!(session.registry().pausable_count(), 1);
        // wall + player + sentry + threat
        assert_eq!(session.physics().collider_count(), 4);
    }

    #[test]
    fn test_threat_without_animator_is_skipped() {
        let mut session = LevelSession::new(open_level()).unwrap();
        let placement = ThreatPlacement {
            position: Vec3::new(5.0, 0.0, 0.0),
            yaw_deg: 0.0,
        };
        assert!(session.spawn_threat(&placement, None).is_err());
        assert!(session.threats().is_empty());
        assert_eq!(session.registry().pausable_count(), 0);
    }

    #[test]
    fn test_missing_movement_rejects_tick() {
        let mut session = LevelSession::new(open_level()).unwrap();
        session.drive_player(Vec3::ZERO, None, false, 0.02);
        session.fixed_update(0.02);
        assert_eq!(session.stats().rejected_player_ticks, 1);
    }

    #[test]
    fn test_remove_sentry_releases_counter() {
        let mut session = LevelSession::new(open_level()).unwrap();
        session.frame_update(0.016);
        assert_eq!(session.player().borrow().visibility().count(), 1);

        let id = session.sentries()[0].borrow().entity();
        assert!(session.remove_sentry(id));
        assert_eq!(session.player().borrow().visibility().count(), 0);
        assert!(!session.remove_sentry(id));
    }

    #[test]
    fn test_unload_returns_stats() {
        let mut session = LevelSession::new(open_level()).unwrap();
        session.request_respawn();
        let stats = session.unload();
        assert_eq!(stats.respawns, 1);
    }
}
