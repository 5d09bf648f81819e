//! Player body state

use crate::error::{Result, SurvivalError};
use crate::temperature::{Activity, TemperatureConfig, TemperatureModel};
use frost_ai::VisibilityCounter;
use frost_core::{EntityId, Resettable, Result as CoreResult};
use frost_math::{Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Movement flags fed by the input layer every fixed tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementState {
    pub is_moving: bool,
    pub is_running: bool,
}

impl MovementState {
    /// Standing still
    pub const IDLE: Self = Self {
        is_moving: false,
        is_running: false,
    };
    /// Walking
    pub const WALKING: Self = Self {
        is_moving: true,
        is_running: false,
    };
    /// Running
    pub const RUNNING: Self = Self {
        is_moving: true,
        is_running: true,
    };

    /// Activity for temperature integration
    pub fn activity(&self) -> Activity {
        if self.is_running {
            Activity::Running
        } else if self.is_moving {
            Activity::Moving
        } else {
            Activity::Standing
        }
    }
}

/// The player's body: temperature, motion and what the level knows about it
#[derive(Debug, Clone)]
pub struct PlayerBody {
    entity: EntityId,
    transform: Transform,
    velocity: Vec3,
    angular_velocity: Vec3,
    temperature: TemperatureModel,
    movement: Option<MovementState>,
    cooling: bool,
    input_locked: bool,
    visibility: VisibilityCounter,
}

impl PlayerBody {
    /// Create a player standing at `spawn`
    pub fn new(entity: EntityId, spawn: Transform, temperature: TemperatureConfig) -> Result<Self> {
        Ok(Self {
            entity,
            transform: spawn,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            temperature: TemperatureModel::new(temperature)?,
            movement: Some(MovementState::IDLE),
            cooling: false,
            input_locked: false,
            visibility: VisibilityCounter::new(),
        })
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Current body temperature
    pub fn temperature(&self) -> f32 {
        self.temperature.current()
    }

    pub fn temperature_model(&self) -> &TemperatureModel {
        &self.temperature
    }

    pub fn movement(&self) -> Option<MovementState> {
        self.movement
    }

    /// Feed the movement state. `None` means the input layer did not report one.
    pub fn set_movement(&mut self, movement: Option<MovementState>) {
        self.movement = movement;
    }

    pub fn is_cooling(&self) -> bool {
        self.cooling
    }

    /// Apply or remove the cooling effect
    pub fn set_cooling(&mut self, cooling: bool) {
        if self.cooling != cooling {
            log::debug!("Player {} cooling {}", self.entity, if cooling { "on" } else { "off" });
        }
        self.cooling = cooling;
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    /// Lock input. Returns `false` if already locked.
    pub fn lock_input(&mut self) -> bool {
        !std::mem::replace(&mut self.input_locked, true)
    }

    /// Unlock input. Returns `false` if not locked.
    pub fn unlock_input(&mut self) -> bool {
        std::mem::replace(&mut self.input_locked, false)
    }

    pub fn visibility(&self) -> &VisibilityCounter {
        &self.visibility
    }

    pub fn visibility_mut(&mut self) -> &mut VisibilityCounter {
        &mut self.visibility
    }

    /// Whether any sentry currently sees the player
    pub fn is_visible_to_any_sentry(&self) -> bool {
        self.visibility.is_visible_to_any()
    }

    /// Move by a displacement over `dt`. Ignored while input is locked.
    pub fn apply_motion(&mut self, displacement: Vec3, dt: f32) -> bool {
        if self.input_locked {
            return false;
        }
        self.transform.position += displacement;
        self.velocity = if dt > 0.0 { displacement / dt } else { Vec3::ZERO };
        if displacement.x.abs() > 1e-6 || displacement.z.abs() > 1e-6 {
            let target = self.transform.position + displacement;
            self.transform.look_at_flat(target);
        }
        true
    }

    /// Zero linear and angular velocity
    pub fn zero_motion(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Place the player at `transform`
    pub fn teleport(&mut self, transform: Transform) {
        self.transform = transform;
        log::debug!("Player {} teleported to {:?}", self.entity, transform.position);
    }

    /// Integrate temperature for one fixed tick.
    ///
    /// A locked player counts as standing still.
    pub fn fixed_update(&mut self, dt: f32) -> Result<f32> {
        let movement = self
            .movement
            .ok_or(SurvivalError::MissingMovementState { entity: self.entity })?;
        let activity = if self.input_locked {
            Activity::Standing
        } else {
            movement.activity()
        };
        Ok(self.temperature.tick(dt, activity, self.cooling))
    }
}

impl Resettable for PlayerBody {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn on_reset(&mut self) -> CoreResult<()> {
        // the visibility counter belongs to the sentries' edges and is left alone
        self.temperature.reset();
        self.cooling = false;
        self.movement = Some(MovementState::IDLE);
        Ok(())
    }
}
