//! Detection sentries (turrets)
//!
//! A sentry wraps a [`VisibilityProbe`] with edge-triggered state. Each
//! sentry owns its `last_visible` flag but shares the player's
//! [`VisibilityCounter`] with every other sentry in the level.

use crate::perception::{ProbeConfig, ProbeTarget, SightQuery, VisibilityProbe};
use frost_core::{EntityId, Resettable, Result as CoreResult};
use frost_math::{radians, Transform, Vec3};
use frost_physics::{LayerMask, PhysicsWorld};
use serde::{Deserialize, Serialize};

/// Number of sentries currently seeing the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityCounter {
    count: u32,
}

impl VisibilityCounter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// A sentry started seeing the player
    pub fn increment(&mut self) {
        self.count += 1;
    }

    /// A sentry stopped seeing the player. Returns `false` if already at zero.
    pub fn decrement(&mut self) -> bool {
        if self.count == 0 {
            log::warn!("Visibility counter decremented below zero; clamped");
            return false;
        }
        self.count -= 1;
        true
    }

    /// Current count
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether at least one sentry sees the player
    pub fn is_visible_to_any(&self) -> bool {
        self.count > 0
    }
}

/// Sentry configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    /// Maximum view distance
    pub view_distance: f32,
    /// Half angle of the view cone, in degrees
    pub view_angle: f32,
    /// Player temperature above which a sighting triggers a respawn
    pub detection_threshold: f32,
    /// Radius of the threat sweep; `None` uses the view distance
    pub threat_radius: Option<f32>,
    /// Layers that block the sentry's sight
    pub occlusion_mask: LayerMask,
    /// Sweep rotation about the up axis, degrees per second
    pub spin_speed_deg: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            view_distance: 15.0,
            view_angle: 45.0,
            detection_threshold: 37.0,
            threat_radius: None,
            occlusion_mask: LayerMask::OBSTACLES,
            spin_speed_deg: 0.0,
        }
    }
}

impl SentryConfig {
    /// Effective threat sweep radius
    pub fn threat_radius(&self) -> f32 {
        self.threat_radius.unwrap_or(self.view_distance)
    }
}

/// Events emitted by a sentry update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentryEvent {
    /// The player became visible to this sentry
    PlayerSpotted { sentry: EntityId },
    /// The player stopped being visible to this sentry
    PlayerLost { sentry: EntityId },
    /// The player is visible and hot enough to be caught
    RespawnRequested { sentry: EntityId },
    /// A threat agent is in sight and must freeze
    FreezeThreat { sentry: EntityId, threat: EntityId },
}

/// Stationary perception agent
#[derive(Debug, Clone)]
pub struct DetectionSentry {
    entity: EntityId,
    transform: Transform,
    initial_transform: Transform,
    config: SentryConfig,
    probe: VisibilityProbe,
    last_visible: bool,
    enabled: bool,
}

impl DetectionSentry {
    /// Create a new sentry
    pub fn new(entity: EntityId, transform: Transform, config: SentryConfig) -> Self {
        Self {
            entity,
            transform,
            initial_transform: transform,
            config,
            probe: VisibilityProbe::default(),
            last_visible: false,
            enabled: true,
        }
    }

    /// Set the probe configuration
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = VisibilityProbe::new(probe);
        self
    }

    /// Sentry entity
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Current transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Configuration
    pub fn config(&self) -> &SentryConfig {
        &self.config
    }

    /// Whether the player was visible on the last update
    pub fn last_visible(&self) -> bool {
        self.last_visible
    }

    /// Whether the sentry is active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn sight_query(&self, max_distance: f32) -> SightQuery {
        SightQuery::new(
            self.transform.position,
            self.transform.forward(),
            max_distance,
            self.config.view_angle,
        )
        .with_mask(self.config.occlusion_mask)
        .with_viewer(self.entity)
    }

    /// Rotate the view cone by one frame of sweep
    pub fn spin(&mut self, dt: f32) {
        if self.config.spin_speed_deg != 0.0 && dt > 0.0 {
            self.transform
                .rotate_around_axis(Vec3::Y, radians(self.config.spin_speed_deg * dt));
        }
    }

    /// Run one frame of perception.
    ///
    /// `temperature` is the player's current body temperature; `threats`
    /// lists the threat agents still able to move.
    pub fn update(
        &mut self,
        dt: f32,
        world: &PhysicsWorld,
        player: &ProbeTarget,
        temperature: f32,
        counter: &mut VisibilityCounter,
        threats: &[ProbeTarget],
    ) -> Vec<SentryEvent> {
        let mut events = Vec::new();
        if !self.enabled {
            return events;
        }

        self.spin(dt);

        let query = self.sight_query(self.config.view_distance);
        let visible = self.probe.is_visible(world, &query, player);

        if visible != self.last_visible {
            if visible {
                counter.increment();
                events.push(SentryEvent::PlayerSpotted { sentry: self.entity });
                log::debug!("Sentry {} spotted player {}", self.entity, player.entity);
            } else {
                counter.decrement();
                events.push(SentryEvent::PlayerLost { sentry: self.entity });
                log::debug!("Sentry {} lost player {}", self.entity, player.entity);
            }
            self.last_visible = visible;
        }

        if visible && temperature > self.config.detection_threshold {
            events.push(SentryEvent::RespawnRequested { sentry: self.entity });
        }

        let radius = self.config.threat_radius();
        let sweep = self.sight_query(radius);
        for threat in threats {
            if threat.position.distance(self.transform.position) > radius {
                continue;
            }
            if self.probe.is_visible(world, &sweep, threat) {
                events.push(SentryEvent::FreezeThreat {
                    sentry: self.entity,
                    threat: threat.entity,
                });
            }
        }

        events
    }

    /// Enable or disable the sentry.
    ///
    /// Disabling while the player is visible issues the pending decrement.
    /// Returns `false` if the state did not change.
    pub fn set_enabled(&mut self, enabled: bool, counter: &mut VisibilityCounter) -> bool {
        if self.enabled == enabled {
            return false;
        }
        if !enabled {
            self.release(counter);
        }
        self.enabled = enabled;
        true
    }

    /// Tear the sentry down, releasing its hold on the counter
    pub fn teardown(&mut self, counter: &mut VisibilityCounter) {
        self.release(counter);
        self.enabled = false;
    }

    fn release(&mut self, counter: &mut VisibilityCounter) {
        if self.last_visible {
            counter.decrement();
            self.last_visible = false;
            log::debug!("Sentry {} released its sighting", self.entity);
        }
    }
}

impl Resettable for DetectionSentry {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn on_reset(&mut self) -> CoreResult<()> {
        // last_visible is left alone: the next frame corrects it through an edge
        self.transform = self.initial_transform;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frost_physics::{ColliderDesc, ColliderShape, CollisionLayer};

    const PLAYER: EntityId = EntityId::from_raw(100);

    fn sentry(id: u64, position: Vec3) -> DetectionSentry {
        DetectionSentry::new(
            EntityId::from_raw(id),
            Transform::from_position(position),
            SentryConfig::default(),
        )
    }

    fn in_view() -> ProbeTarget {
        ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -6.0))
    }

    fn out_of_view() -> ProbeTarget {
        ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, 30.0))
    }

    #[test]
    fn test_edges_fire_once() {
        let world = PhysicsWorld::new();
        let mut counter = VisibilityCounter::new();
        let mut s = sentry(1, Vec3::new(0.0, 1.6, 0.0));

        let events = s.update(0.1, &world, &in_view(), 36.0, &mut counter, &[]);
        assert_eq!(events, vec![SentryEvent::PlayerSpotted { sentry: s.entity() }]);
        assert_eq!(counter.count(), 1);

        let events = s.update(0.1, &world, &in_view(), 36.0, &mut counter, &[]);
        assert!(events.is_empty());
        assert_eq!(counter.count(), 1);

        let events = s.update(0.1, &world, &out_of_view(), 36.0, &mut counter, &[]);
        assert_eq!(events, vec![SentryEvent::PlayerLost { sentry: s.entity() }]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_hot_player_requests_respawn_every_frame() {
        let world = PhysicsWorld::new();
        let mut counter = VisibilityCounter::new();
        let mut s = sentry(1, Vec3::new(0.0, 1.6, 0.0));

        let events = s.update(0.1, &world, &in_view(), 37.5, &mut counter, &[]);
        assert!(events.contains(&SentryEvent::RespawnRequested { sentry: s.entity() }));

        let events = s.update(0.1, &world, &in_view(), 37.5, &mut counter, &[]);
        assert_eq!(events, vec![SentryEvent::RespawnRequested { sentry: s.entity() }]);

        // at threshold is not above it
        let events = s.update(0.1, &world, &in_view(), 37.0, &mut counter, &[]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_counter_matches_visible_sentries() {
        let world = PhysicsWorld::new();
        let mut counter = VisibilityCounter::new();
        let mut sentries = vec![
            sentry(1, Vec3::new(0.0, 1.6, 0.0)),
            sentry(2, Vec3::new(1.0, 1.6, 0.0)),
            sentry(3, Vec3::new(-1.0, 1.6, 0.0)),
        ];

        for s in sentries.iter_mut() {
            s.update(0.1, &world, &in_view(), 36.0, &mut counter, &[]);
        }
        assert_eq!(counter.count(), 3);

        sentries[1].update(0.1, &world, &out_of_view(), 36.0, &mut counter, &[]);
        assert_eq!(counter.count(), 2);

        for s in sentries.iter_mut() {
            s.update(0.1, &world, &out_of_view(), 36.0, &mut counter, &[]);
        }
        assert_eq!(counter.count(), 0);
        assert!(!counter.is_visible_to_any());
    }

    #[test]
    fn test_disable_releases_sighting() {
        let world = PhysicsWorld::new();
        let mut counter = VisibilityCounter::new();
        let mut s = sentry(1, Vec3::new(0.0, 1.6, 0.0));

        s.update(0.1, &world, &in_view(), 36.0, &mut counter, &[]);
        assert_eq!(counter.count(), 1);

        assert!(s.set_enabled(false, &mut counter));
        assert_eq!(counter.count(), 0);
        assert!(!s.set_enabled(false, &mut counter));

        // disabled sentries see nothing
        assert!(s.update(0.1, &world, &in_view(), 40.0, &mut counter, &[]).is_empty());

        assert!(s.set_enabled(true, &mut counter));
        s.update(0.1, &world, &in_view(), 36.0, &mut counter, &[]);
        assert_eq!(counter.count(), 1);

        s.teardown(&mut counter);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_counter_never_negative() {
        let mut counter = VisibilityCounter::new();
        assert!(!counter.decrement());
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_threat_sweep_freezes_visible_threats() {
        let mut world = PhysicsWorld::new();
        world
            .add_collider(
                EntityId::from_raw(50),
                Vec3::new(2.0, 1.5, -3.0),
                ColliderDesc::new(ColliderShape::cuboid(1.0, 2.0, 0.2)).with_layer(CollisionLayer::ENVIRONMENT),
            )
            .unwrap();

        let mut counter = VisibilityCounter::new();
        let mut s = sentry(1, Vec3::new(0.0, 1.6, 0.0));
        let visible = ProbeTarget::new(EntityId::from_raw(20), Vec3::new(-1.0, 0.0, -5.0));
        let hidden = ProbeTarget::new(EntityId::from_raw(21), Vec3::new(4.0, 0.0, -6.0));
        let far = ProbeTarget::new(EntityId::from_raw(22), Vec3::new(0.0, 0.0, -40.0));

        let events = s.update(0.1, &world, &out_of_view(), 40.0, &mut counter, &[visible, hidden, far]);
        assert_eq!(
            events,
            vec![SentryEvent::FreezeThreat {
                sentry: s.entity(),
                threat: EntityId::from_raw(20)
            }]
        );
    }

    #[test]
    fn test_spin_sweeps_cone_and_reset_restores() {
        let world = PhysicsWorld::new();
        let mut counter = VisibilityCounter::new();
        let config = SentryConfig {
            spin_speed_deg: 90.0,
            ..Default::default()
        };
        let mut s = DetectionSentry::new(EntityId::from_raw(1), Transform::from_position(Vec3::new(0.0, 1.6, 0.0)), config);

        // one second of sweep turns -Z into -X
        s.spin(1.0);
        let fwd = s.transform().forward();
        assert_relative_eq!(fwd.x, -1.0, epsilon = 1e-4);

        let left = ProbeTarget::new(PLAYER, Vec3::new(-6.0, 0.0, 0.0));
        let events = s.update(0.0, &world, &left, 36.0, &mut counter, &[]);
        assert_eq!(events, vec![SentryEvent::PlayerSpotted { sentry: s.entity() }]);

        s.on_reset().unwrap();
        assert_eq!(s.transform().forward(), Transform::IDENTITY.forward());
    }
}
