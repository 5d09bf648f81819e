//! Spherical detector volume with enter/exit edges

use frost_core::EntityId;
use frost_math::Vec3;
use std::collections::HashSet;

/// Edge produced by a detector volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorEvent {
    /// Entity moved inside the volume
    Entered(EntityId),
    /// Entity left the volume
    Exited(EntityId),
}

/// Sphere that reports which watched entities enter or leave it.
///
/// The volume follows its owner; the owner passes its position on every
/// update.
#[derive(Debug, Clone)]
pub struct DetectorVolume {
    radius: f32,
    occupants: HashSet<EntityId>,
}

impl DetectorVolume {
    /// Create a new detector
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            occupants: HashSet::new(),
        }
    }

    /// Detection radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Check whether an entity is currently inside
    pub fn contains(&self, entity: EntityId) -> bool {
        self.occupants.contains(&entity)
    }

    /// Entities currently inside
    pub fn occupants(&self) -> impl Iterator<Item = &EntityId> {
        self.occupants.iter()
    }

    /// Forget every occupant. Anything still inside enters again on the next update.
    pub fn clear(&mut self) {
        self.occupants.clear();
    }

    /// Test watched entities against the volume centered at `center`
    pub fn update(&mut self, center: Vec3, watched: &[(EntityId, Vec3)]) -> Vec<DetectorEvent> {
        let mut events = Vec::new();
        let radius_sq = self.radius * self.radius;

        for (entity, position) in watched {
            let inside = (*position - center).length_squared() <= radius_sq;
            let was_inside = self.occupants.contains(entity);

            if inside && !was_inside {
                self.occupants.insert(*entity);
                events.push(DetectorEvent::Entered(*entity));
            } else if !inside && was_inside {
                self.occupants.remove(entity);
                events.push(DetectorEvent::Exited(*entity));
            }
        }

        events
    }
}
