//! Entity identifiers

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a simulated entity (player, sentry, threat agent, wall...)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Create an id from raw bits
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw bits
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Widen into the user-data slot used by the physics backend
    #[inline]
    pub const fn to_user_data(self) -> u128 {
        self.0 as u128
    }

    /// Recover an id stored as physics user data
    #[inline]
    pub const fn from_user_data(data: u128) -> Self {
        Self(data as u64)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Id generator owned by a level session
///
/// Ids start at 1 so that 0 stays free as "no user data" in the physics world.
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a new generator
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next unique id
    pub fn next(&self) -> EntityId {
        EntityId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
