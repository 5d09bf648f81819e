//! Collision layers and masks

use serde::{Deserialize, Serialize};

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Default layer
    pub const DEFAULT: Self = Self(0);
    /// Player body
    pub const PLAYER: Self = Self(1);
    /// Threat agents (zombies)
    pub const THREATS: Self = Self(2);
    /// Sentry housings
    pub const SENTRIES: Self = Self(3);
    /// Trigger/sensor layer
    pub const TRIGGERS: Self = Self(4);
    /// Static environment (walls, crates, doors)
    pub const ENVIRONMENT: Self = Self(5);

    /// Create a custom layer
    pub const fn custom(id: u32) -> Self {
        Self(id)
    }

    /// Get the layer as a bitmask
    pub const fn as_mask(&self) -> u32 {
        1 << self.0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A set of layers, used to select which colliders a query may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer
    pub const ALL: Self = Self(u32::MAX);
    /// No layer
    pub const NONE: Self = Self(0);

    /// Mask for the usual line-of-sight blockers
    pub const OBSTACLES: Self =
        Self(CollisionLayer::DEFAULT.as_mask() | CollisionLayer::ENVIRONMENT.as_mask());

    /// Build a mask from a list of layers
    pub fn from_layers(layers: &[CollisionLayer]) -> Self {
        Self(layers.iter().fold(0u32, |acc, l| acc | l.as_mask()))
    }

    /// Add a layer
    pub fn with(mut self, layer: CollisionLayer) -> Self {
        self.0 |= layer.as_mask();
        self
    }

    /// Remove a layer
    pub fn without(mut self, layer: CollisionLayer) -> Self {
        self.0 &= !layer.as_mask();
        self
    }

    /// Check whether a layer is selected
    pub fn contains(&self, layer: CollisionLayer) -> bool {
        self.0 & layer.as_mask() != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::OBSTACLES
    }
}
