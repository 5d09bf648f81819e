//! Physics world - collider container for line-of-sight queries

use crate::collider::{ColliderDesc, ColliderHandle};
use crate::error::{PhysicsError, Result};
use crate::query::PhysicsQuery;
use frost_core::EntityId;
use frost_math::{Aabb, Vec3};
use rapier3d::prelude as rapier;
use std::collections::HashMap;

/// A collider attached to an entity
#[derive(Debug, Clone, Copy)]
struct AttachedCollider {
    handle: ColliderHandle,
    offset: Vec3,
}

/// The world of colliders that rays are cast against.
///
/// There is no dynamics step: entity positions are pushed in by the game
/// systems and the query pipeline is refreshed on every change.
pub struct PhysicsWorld {
    /// Island manager (required by collider removal)
    islands: rapier::IslandManager,

    /// Query pipeline
    query_pipeline: rapier::QueryPipeline,

    /// Rigid body set (always empty, colliders are free-standing)
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Colliders owned by each entity
    entity_colliders: HashMap<EntityId, Vec<AttachedCollider>>,

    /// Last known entity positions
    positions: HashMap<EntityId, Vec3>,

    /// Child -> parent links
    parents: HashMap<EntityId, EntityId>,
}

impl PhysicsWorld {
    /// Create a new, empty physics world
    pub fn new() -> Self {
        Self {
            islands: rapier::IslandManager::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            entity_colliders: HashMap::new(),
            positions: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    // ==================== Colliders ====================

    /// Attach a collider to an entity standing at `position`
    pub fn add_collider(&mut self, entity: EntityId, position: Vec3, desc: ColliderDesc) -> Result<ColliderHandle> {
        if !desc.shape.is_valid() {
            return Err(PhysicsError::ShapeCreationFailed(format!(
                "{:?} for entity {}",
                desc.shape, entity
            )));
        }

        let handle = ColliderHandle(
            self.colliders
                .insert(desc.to_rapier_builder(position, entity.to_user_data())),
        );
        self.entity_colliders
            .entry(entity)
            .or_default()
            .push(AttachedCollider {
                handle,
                offset: desc.offset,
            });
        self.positions.insert(entity, position);
        self.sync_query_pipeline();

        log::trace!("Collider {:?} attached to {}", handle, entity);
        Ok(handle)
    }

    /// Get the colliders owned by an entity
    pub fn colliders_of(&self, entity: EntityId) -> Vec<ColliderHandle> {
        self.entity_colliders
            .get(&entity)
            .map(|list| list.iter().map(|c| c.handle).collect())
            .unwrap_or_default()
    }

    /// Remove an entity, its colliders and its hierarchy links
    pub fn remove_entity(&mut self, entity: EntityId) {
        if let Some(list) = self.entity_colliders.remove(&entity) {
            for attached in list {
                self.colliders
                    .remove(attached.handle.0, &mut self.islands, &mut self.bodies, true);
            }
        }
        self.positions.remove(&entity);
        self.parents.remove(&entity);
        self.parents.retain(|_, parent| *parent != entity);
        self.sync_query_pipeline();
    }

    /// Whether the entity is known to the world
    pub fn contains(&self, entity: EntityId) -> bool {
        self.positions.contains_key(&entity)
    }

    // ==================== Positions ====================

    /// Register an entity position without adding a collider
    pub fn track_entity(&mut self, entity: EntityId, position: Vec3) {
        self.positions.insert(entity, position);
    }

    /// Get an entity's last known position
    pub fn entity_position(&self, entity: EntityId) -> Option<Vec3> {
        self.positions.get(&entity).copied()
    }

    /// Move an entity. Descendants move by the same delta.
    pub fn set_entity_position(&mut self, entity: EntityId, position: Vec3) {
        let delta = match self.positions.get(&entity) {
            Some(old) => position - *old,
            None => {
                self.positions.insert(entity, position);
                Vec3::ZERO
            }
        };

        if delta == Vec3::ZERO && self.positions.contains_key(&entity) {
            self.place_colliders(entity);
            return;
        }

        let mut moved = vec![entity];
        moved.extend(self.descendants_of(entity));
        for e in moved {
            if let Some(p) = self.positions.get_mut(&e) {
                *p += delta;
            }
            self.place_colliders(e);
        }
        self.sync_query_pipeline();
    }

    fn place_colliders(&mut self, entity: EntityId) {
        let Some(position) = self.positions.get(&entity).copied() else {
            return;
        };
        let Some(list) = self.entity_colliders.get(&entity) else {
            return;
        };
        for attached in list {
            if let Some(collider) = self.colliders.get_mut(attached.handle.0) {
                let at = position + attached.offset;
                collider.set_translation(rapier::Vector::new(at.x, at.y, at.z));
            }
        }
    }

    /// Refresh the query acceleration structure
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    // ==================== Hierarchy ====================

    /// Parent `child` under `parent`
    pub fn set_parent(&mut self, child: EntityId, parent: EntityId) -> Result<()> {
        if child == parent || self.is_self_or_descendant(parent, child) {
            return Err(PhysicsError::HierarchyCycle { child, parent });
        }
        self.parents.insert(child, parent);
        Ok(())
    }

    /// Detach an entity from its parent
    pub fn clear_parent(&mut self, child: EntityId) {
        self.parents.remove(&child);
    }

    /// Get an entity's parent
    pub fn parent_of(&self, entity: EntityId) -> Option<EntityId> {
        self.parents.get(&entity).copied()
    }

    /// True if `candidate` is `ancestor` or sits anywhere below it
    pub fn is_self_or_descendant(&self, candidate: EntityId, ancestor: EntityId) -> bool {
        let mut current = Some(candidate);
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            current = self.parents.get(&e).copied();
        }
        false
    }

    fn descendants_of(&self, entity: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![entity];
        while let Some(current) = stack.pop() {
            for (child, parent) in &self.parents {
                if *parent == current {
                    out.push(*child);
                    stack.push(*child);
                }
            }
        }
        out
    }

    // ==================== Bounds ====================

    /// World-space bounds of an entity's own colliders
    pub fn entity_bounds(&self, entity: EntityId) -> Option<Aabb> {
        let list = self.entity_colliders.get(&entity)?;
        let mut bounds = Aabb::EMPTY;
        for attached in list {
            if let Some(collider) = self.colliders.get(attached.handle.0) {
                let aabb = collider.compute_aabb();
                bounds = bounds.union(&Aabb::new(
                    Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
                    Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
                ));
            }
        }
        bounds.is_valid().then_some(bounds)
    }

    // ==================== Queries ====================

    /// Get a query interface
    pub fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
        }
    }

    /// Get collider count
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
