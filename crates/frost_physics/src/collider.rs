//! Collider shapes and descriptions

use crate::layers::CollisionLayer;
use frost_math::Vec3;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::ColliderHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ColliderHandle {
        self.0
    }
}

/// Collision shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Capsule aligned along Y axis
    CapsuleY { half_height: f32, radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY { half_height, radius }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Sphere { radius } => rapier::SharedShape::ball(*radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::CapsuleY { half_height, radius } => {
                rapier::SharedShape::capsule_y(*half_height, *radius)
            }
        }
    }

    /// Whether every dimension is strictly positive
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Sphere { radius } => *radius > 0.0,
            Self::Box { half_extents } => half_extents.iter().all(|h| *h > 0.0),
            Self::CapsuleY { half_height, radius } => *half_height >= 0.0 && *radius > 0.0,
        }
    }
}

/// Collider description
///
/// The collider is attached to an entity at an `offset` from the entity's
/// position and moves with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Offset from the owning entity's position
    #[serde(default)]
    pub offset: Vec3,
    /// Sensors never block rays
    #[serde(default)]
    pub is_sensor: bool,
    /// Layer this collider lives on
    #[serde(default)]
    pub layer: CollisionLayer,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            offset: Vec3::ZERO,
            is_sensor: false,
            layer: CollisionLayer::DEFAULT,
        }
    }
}

impl ColliderDesc {
    /// Create a collider description
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Set offset from the owner
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set as sensor
    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// Set the collision layer
    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Build the Rapier collider for an owner at `position`
    pub(crate) fn to_rapier_builder(&self, position: Vec3, user_data: u128) -> rapier::ColliderBuilder {
        let at = position + self.offset;
        rapier::ColliderBuilder::new(self.shape.to_rapier())
            .translation(rapier::Vector::new(at.x, at.y, at.z))
            .sensor(self.is_sensor)
            .collision_groups(rapier::InteractionGroups::new(
                rapier::Group::from_bits_truncate(self.layer.as_mask()),
                rapier::Group::ALL,
            ))
            .user_data(user_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validity() {
        assert!(ColliderShape::sphere(0.5).is_valid());
        assert!(!ColliderShape::sphere(0.0).is_valid());
        assert!(!ColliderShape::cuboid(1.0, -1.0, 1.0).is_valid());
        assert!(ColliderShape::capsule(0.5, 0.3).is_valid());
    }

    #[test]
    fn test_desc_builder() {
        let desc = ColliderDesc::new(ColliderShape::sphere(1.0))
            .with_offset(Vec3::new(0.0, 1.0, 0.0))
            .with_layer(CollisionLayer::PLAYER)
            .sensor();
        assert!(desc.is_sensor);
        assert_eq!(desc.layer, CollisionLayer::PLAYER);
        assert_eq!(desc.offset.y, 1.0);
    }
}
