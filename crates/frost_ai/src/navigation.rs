//! Navigation agent contract
//!
//! Pathfinding lives outside this crate. Threat agents only issue commands
//! through [`NavigationAgent`]; [`DirectNavAgent`] is a headless stand-in that
//! walks in a straight line.

use frost_math::Vec3;
use serde::{Deserialize, Serialize};

/// Commands a threat agent may issue to whatever moves it
pub trait NavigationAgent {
    /// Set the point to move toward. Returns `false` if the agent is disabled.
    fn set_destination(&mut self, destination: Vec3) -> bool;

    /// Current destination, if any
    fn destination(&self) -> Option<Vec3>;

    /// Halt movement, keeping the current path
    fn stop(&mut self);

    /// Resume movement after [`stop`](Self::stop)
    fn resume(&mut self);

    /// Whether movement is halted
    fn is_stopped(&self) -> bool;

    /// Drop the current path
    fn reset_path(&mut self);

    /// Whether the agent accepts commands
    fn is_enabled(&self) -> bool;

    /// Enable or disable the agent
    fn set_enabled(&mut self, enabled: bool);

    /// Current velocity
    fn velocity(&self) -> Vec3;

    /// Maximum movement speed
    fn speed(&self) -> f32;

    /// Current position
    fn position(&self) -> Vec3;

    /// Teleport without walking. Returns `false` if the agent is disabled.
    fn warp(&mut self, position: Vec3) -> bool;

    /// Advance movement by `dt` seconds
    fn update(&mut self, dt: f32);
}

/// Navigation agent that moves straight toward its destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectNavAgent {
    /// Current position
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Point being walked to
    pub destination: Option<Vec3>,
    /// Movement speed
    pub speed: f32,
    /// Distance at which the destination counts as reached
    pub arrival_threshold: f32,
    enabled: bool,
    stopped: bool,
}

impl DirectNavAgent {
    /// Create a new agent at `position`
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            destination: None,
            speed,
            arrival_threshold: 0.05,
            enabled: true,
            stopped: false,
        }
    }

    /// Set the arrival threshold
    pub fn with_arrival_threshold(mut self, threshold: f32) -> Self {
        self.arrival_threshold = threshold;
        self
    }

    /// Check if the destination has been reached (or there is none)
    pub fn has_arrived(&self) -> bool {
        match self.destination {
            Some(dest) => self.position.distance(dest) <= self.arrival_threshold,
            None => true,
        }
    }
}

impl NavigationAgent for DirectNavAgent {
    fn set_destination(&mut self, destination: Vec3) -> bool {
        if !self.enabled {
            return false;
        }
        self.destination = Some(destination);
        true
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.velocity = Vec3::ZERO;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.velocity = Vec3::ZERO;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.velocity = Vec3::ZERO;
        }
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn warp(&mut self, position: Vec3) -> bool {
        if !self.enabled {
            return false;
        }
        self.position = position;
        self.velocity = Vec3::ZERO;
        true
    }

    fn update(&mut self, dt: f32) {
        if !self.enabled || self.stopped || dt <= 0.0 || self.has_arrived() {
            self.velocity = Vec3::ZERO;
            return;
        }
        let Some(dest) = self.destination else {
            return;
        };

        let next = self.position.move_towards(dest, self.speed * dt);
        self.velocity = (next - self.position) / dt;
        self.position = next;
    }
}
