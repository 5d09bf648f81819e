//! Line-of-sight perception
//!
//! A sight check runs four stages in a fixed order and stops at the first
//! one that fails:
//!
//! 1. resolve the aim point on the target (bounds center, else position plus eye height)
//! 2. distance to the aim point against the view distance
//! 3. angle between the viewer's forward and the aim direction against the half angle
//! 4. an occlusion ray toward the aim point, bounded by the measured distance
//!
//! The order doubles as the diagnostic tie-break: [`Visibility`] reports the
//! first stage that failed.

use frost_core::EntityId;
use frost_math::Vec3;
use frost_physics::{LayerMask, PhysicsWorld, RaycastOptions};
use serde::{Deserialize, Serialize};

/// Probe configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Height above a target's position used as the aim point when the
    /// target has no collider bounds
    pub eye_height: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { eye_height: 1.6 }
    }
}

/// Something a probe can look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeTarget {
    /// Target entity (its descendants count as the target too)
    pub entity: EntityId,
    /// Target position (feet)
    pub position: Vec3,
}

impl ProbeTarget {
    /// Create a new probe target
    pub fn new(entity: EntityId, position: Vec3) -> Self {
        Self { entity, position }
    }
}

/// Where and how a viewer is looking
#[derive(Debug, Clone, PartialEq)]
pub struct SightQuery {
    /// Eye position
    pub origin: Vec3,
    /// View direction
    pub forward: Vec3,
    /// Maximum view distance
    pub max_distance: f32,
    /// Half angle of the view cone, in degrees
    pub half_angle_deg: f32,
    /// Layers that block sight
    pub occlusion_mask: LayerMask,
    /// The viewer's own entity, ignored by the occlusion ray
    pub viewer: Option<EntityId>,
}

impl SightQuery {
    /// Create a sight query with the default occlusion mask
    pub fn new(origin: Vec3, forward: Vec3, max_distance: f32, half_angle_deg: f32) -> Self {
        Self {
            origin,
            forward,
            max_distance,
            half_angle_deg,
            occlusion_mask: LayerMask::OBSTACLES,
            viewer: None,
        }
    }

    /// Set the occlusion mask
    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.occlusion_mask = mask;
        self
    }

    /// Set the viewer entity
    pub fn with_viewer(mut self, viewer: EntityId) -> Self {
        self.viewer = Some(viewer);
        self
    }
}

/// Outcome of a sight check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// Target can be seen
    Visible,
    /// Aim point is farther than the view distance
    OutOfRange { distance: f32 },
    /// Aim point is outside the view cone
    OutsideCone { angle_deg: f32 },
    /// Something else is in the way
    Occluded { by: EntityId },
}

impl Visibility {
    /// Whether the target can be seen
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Stateless line-of-sight test
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityProbe {
    config: ProbeConfig,
}

impl VisibilityProbe {
    /// Create a new probe
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Aim point on a target
    pub fn anchor(&self, world: &PhysicsWorld, target: &ProbeTarget) -> Vec3 {
        match world.entity_bounds(target.entity) {
            Some(bounds) => bounds.center(),
            None => target.position + Vec3::new(0.0, self.config.eye_height, 0.0),
        }
    }

    /// Run the full sight check
    pub fn probe(&self, world: &PhysicsWorld, query: &SightQuery, target: &ProbeTarget) -> Visibility {
        let anchor = self.anchor(world, target);
        let to_anchor = anchor - query.origin;

        let distance = to_anchor.length();
        if distance > query.max_distance {
            return Visibility::OutOfRange { distance };
        }

        let angle_deg = query.forward.angle_deg(to_anchor);
        if angle_deg > query.half_angle_deg {
            return Visibility::OutsideCone { angle_deg };
        }

        let mut options = RaycastOptions::default()
            .with_max_distance(distance)
            .with_mask(query.occlusion_mask);
        if let Some(viewer) = query.viewer {
            options = options.exclude(viewer);
        }

        match world.query().raycast(query.origin, to_anchor, &options) {
            Some(hit) if !world.is_self_or_descendant(hit.entity, target.entity) => {
                Visibility::Occluded { by: hit.entity }
            }
            _ => Visibility::Visible,
        }
    }

    /// Whether the target can be seen
    pub fn is_visible(&self, world: &PhysicsWorld, query: &SightQuery, target: &ProbeTarget) -> bool {
        self.probe(world, query, target).is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_physics::{ColliderDesc, ColliderShape, CollisionLayer};

    const VIEWER: EntityId = EntityId::from_raw(1);
    const PLAYER: EntityId = EntityId::from_raw(2);
    const WALL: EntityId = EntityId::from_raw(3);
    const HAT: EntityId = EntityId::from_raw(4);

    fn query() -> SightQuery {
        SightQuery::new(Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z, 10.0, 45.0).with_viewer(VIEWER)
    }

    #[test]
    fn test_visible_ahead_at_half_range() {
        let world = PhysicsWorld::new();
        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(probe.probe(&world, &query(), &target), Visibility::Visible);
    }

    #[test]
    fn test_out_of_range() {
        let world = PhysicsWorld::new();
        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -12.0));
        assert!(matches!(probe.probe(&world, &query(), &target), Visibility::OutOfRange { .. }));
    }

    #[test]
    fn test_outside_cone() {
        let world = PhysicsWorld::new();
        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(5.0, 0.0, -1.0));
        assert!(matches!(probe.probe(&world, &query(), &target), Visibility::OutsideCone { .. }));
    }

    #[test]
    fn test_range_checked_before_cone() {
        let world = PhysicsWorld::new();
        let probe = VisibilityProbe::default();
        // behind the viewer and out of range: range wins
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, 20.0));
        assert!(matches!(probe.probe(&world, &query(), &target), Visibility::OutOfRange { .. }));
    }

    #[test]
    fn test_occluder_blocks_sight() {
        let mut world = PhysicsWorld::new();
        world
            .add_collider(
                WALL,
                Vec3::new(0.0, 1.5, -3.0),
                ColliderDesc::new(ColliderShape::cuboid(2.0, 2.0, 0.2)).with_layer(CollisionLayer::ENVIRONMENT),
            )
            .unwrap();
        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(probe.probe(&world, &query(), &target), Visibility::Occluded { by: WALL });
        assert!(!probe.is_visible(&world, &query(), &target));
    }

    #[test]
    fn test_occluder_behind_target_ignored() {
        let mut world = PhysicsWorld::new();
        world
            .add_collider(
                WALL,
                Vec3::new(0.0, 1.5, -8.0),
                ColliderDesc::new(ColliderShape::cuboid(2.0, 2.0, 0.2)).with_layer(CollisionLayer::ENVIRONMENT),
            )
            .unwrap();
        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -5.0));
        assert!(probe.is_visible(&world, &query(), &target));
    }

    #[test]
    fn test_hitting_target_descendant_counts_as_visible() {
        let mut world = PhysicsWorld::new();
        world.track_entity(PLAYER, Vec3::new(0.0, 0.0, -5.0));
        world
            .add_collider(
                HAT,
                Vec3::new(0.0, 1.6, -4.5),
                ColliderDesc::new(ColliderShape::sphere(0.3)).with_layer(CollisionLayer::ENVIRONMENT),
            )
            .unwrap();
        world.set_parent(HAT, PLAYER).unwrap();

        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -5.0));
        assert!(probe.is_visible(&world, &query(), &target));
    }

    #[test]
    fn test_anchor_uses_bounds_center() {
        let mut world = PhysicsWorld::new();
        world
            .add_collider(
                PLAYER,
                Vec3::new(0.0, 0.0, -5.0),
                ColliderDesc::new(ColliderShape::capsule(0.5, 0.4))
                    .with_offset(Vec3::new(0.0, 0.9, 0.0))
                    .with_layer(CollisionLayer::PLAYER),
            )
            .unwrap();
        let probe = VisibilityProbe::default();
        let anchor = probe.anchor(&world, &ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -5.0)));
        assert!((anchor.y - 0.9).abs() < 1e-4);

        let fallback = probe.anchor(&world, &ProbeTarget::new(HAT, Vec3::ZERO));
        assert!((fallback.y - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_viewer_does_not_occlude_itself() {
        let mut world = PhysicsWorld::new();
        world
            .add_collider(
                VIEWER,
                Vec3::new(0.0, 1.6, 0.0),
                ColliderDesc::new(ColliderShape::sphere(0.5)).with_layer(CollisionLayer::ENVIRONMENT),
            )
            .unwrap();
        let probe = VisibilityProbe::default();
        let target = ProbeTarget::new(PLAYER, Vec3::new(0.0, 0.0, -5.0));
        assert!(probe.is_visible(&world, &query(), &target));
    }
}
