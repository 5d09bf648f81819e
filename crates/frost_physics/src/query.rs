//! Physics queries (raycasting)

use crate::collider::ColliderHandle;
use crate::layers::LayerMask;
use frost_core::EntityId;
use frost_math::Vec3;
use rapier3d::prelude as rapier;

/// Result of a raycast query
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Entity owning the collider
    pub entity: EntityId,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Options for raycast queries
#[derive(Debug, Clone)]
pub struct RaycastOptions {
    /// Maximum distance for the ray
    pub max_distance: f32,
    /// Only hit solid colliders (not sensors)
    pub solid_only: bool,
    /// Layers the ray may hit
    pub mask: LayerMask,
    /// Entities whose colliders are ignored
    pub exclude: Vec<EntityId>,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::MAX,
            solid_only: true,
            mask: LayerMask::ALL,
            exclude: Vec::new(),
        }
    }
}

impl RaycastOptions {
    /// Set maximum distance
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Set whether to hit sensors
    pub fn with_sensors(mut self, include_sensors: bool) -> Self {
        self.solid_only = !include_sensors;
        self
    }

    /// Set the layer mask
    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Ignore every collider of an entity
    pub fn exclude(mut self, entity: EntityId) -> Self {
        self.exclude.push(entity);
        self
    }
}

/// Query interface for physics world
pub struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
}

impl<'a> PhysicsQuery<'a> {
    /// Cast a ray and get the first hit.
    ///
    /// `direction` does not need to be normalized; a zero direction never hits.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, options: &RaycastOptions) -> Option<RaycastHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || options.max_distance <= 0.0 {
            return None;
        }

        let ray = rapier::Ray::new(
            rapier::Point::new(origin.x, origin.y, origin.z),
            rapier::Vector::new(dir.x, dir.y, dir.z),
        );

        let excluded = |_handle: rapier::ColliderHandle, collider: &rapier::Collider| {
            !options
                .exclude
                .iter()
                .any(|e| e.to_user_data() == collider.user_data)
        };

        let mut filter = rapier::QueryFilter::new()
            .groups(rapier::InteractionGroups::new(
                rapier::Group::ALL,
                rapier::Group::from_bits_truncate(options.mask.0),
            ))
            .predicate(&excluded);

        if options.solid_only {
            filter = filter.exclude_sensors();
        }

        let (handle, toi) = self.query_pipeline.cast_ray(
            self.bodies,
            self.colliders,
            &ray,
            options.max_distance,
            true,
            filter,
        )?;

        let collider = self.colliders.get(handle)?;
        let point = ray.point_at(toi);

        Some(RaycastHit {
            collider: ColliderHandle(handle),
            entity: EntityId::from_user_data(collider.user_data),
            point: Vec3::new(point.x, point.y, point.z),
            distance: toi,
        })
    }

    /// Check whether anything on `mask` lies between two points
    pub fn line_blocked(&self, from: Vec3, to: Vec3, mask: LayerMask) -> bool {
        let options = RaycastOptions::default()
            .with_max_distance(from.distance(to))
            .with_mask(mask);
        self.raycast(from, to - from, &options).is_some()
    }
}
