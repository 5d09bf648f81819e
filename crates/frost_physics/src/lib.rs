//! Frost Physics - Rapier 3D occlusion world
//!
//! Frostbite never simulates rigid-body dynamics; movement is decided by the
//! game systems and the navigation agents. What it needs from physics is a
//! world of colliders that can be ray-cast for line of sight, with:
//!
//! - Colliders owned by entities (user data carries the [`EntityId`])
//! - Collision layers and masks for selecting what counts as an occluder
//! - A parent/child hierarchy so a ray that hits "part of the target" still
//!   counts as hitting the target
//! - World-space bounds per entity, used as the aim point of a sight check
//!
//! # Example
//!
//! ```ignore
//! use frost_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new();
//! physics.add_collider(wall, Vec3::new(0.0, 1.0, -5.0), ColliderDesc::new(ColliderShape::cuboid(2.0, 1.0, 0.2)));
//! let hit = physics.query().raycast(origin, direction, &RaycastOptions::default());
//! ```
//!
//! [`EntityId`]: frost_core::EntityId

pub mod collider;
pub mod error;
pub mod layers;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::layers::{CollisionLayer, LayerMask};
    pub use crate::query::{PhysicsQuery, RaycastHit, RaycastOptions};
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
