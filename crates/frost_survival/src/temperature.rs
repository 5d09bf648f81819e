//! Body temperature integrator

use crate::error::{Result, SurvivalError};
use frost_math::move_towards;
use serde::{Deserialize, Serialize};

/// What the body is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Standing,
    Moving,
    Running,
}

/// Which rate table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureZone {
    /// Below baseline
    Cold,
    /// At or above baseline
    Standard,
}

/// Degrees per second for each activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRates {
    pub run: f32,
    #[serde(rename = "move")]
    pub moving: f32,
    pub stand: f32,
}

impl ZoneRates {
    /// Create a rate table
    pub const fn new(run: f32, moving: f32, stand: f32) -> Self {
        Self { run, moving, stand }
    }

    /// Rate for an activity
    pub fn rate(&self, activity: Activity) -> f32 {
        match activity {
            Activity::Running => self.run,
            Activity::Moving => self.moving,
            Activity::Standing => self.stand,
        }
    }
}

/// Temperature configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Baseline; the floor without cooling
    pub min: f32,
    /// Floor while cooling
    pub min_with_cooling: f32,
    /// Ceiling
    pub max: f32,
    /// Rates below baseline
    pub cold: ZoneRates,
    /// Rates at or above baseline
    pub standard: ZoneRates,
    /// Subtracted from the rate while cooling
    pub cooling_power: f32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            min: 36.0,
            min_with_cooling: 34.0,
            max: 38.0,
            cold: ZoneRates::new(0.3, 0.15, 0.05),
            standard: ZoneRates::new(0.2, 0.0, -0.1),
            cooling_power: 0.2,
        }
    }
}

impl TemperatureConfig {
    /// Check bounds ordering
    pub fn validate(&self) -> Result<()> {
        if !(self.min_with_cooling <= self.min && self.min <= self.max) {
            return Err(SurvivalError::InvalidConfig(format!(
                "expected min_with_cooling <= min <= max, got {} / {} / {}",
                self.min_with_cooling, self.min, self.max
            )));
        }
        if self.cooling_power < 0.0 {
            return Err(SurvivalError::InvalidConfig(format!(
                "cooling_power must not be negative, got {}",
                self.cooling_power
            )));
        }
        Ok(())
    }

    /// Rate table for a zone
    pub fn rates(&self, zone: TemperatureZone) -> &ZoneRates {
        match zone {
            TemperatureZone::Cold => &self.cold,
            TemperatureZone::Standard => &self.standard,
        }
    }
}

/// Per-tick body temperature integrator.
///
/// Standing still without cooling drifts back toward `min` and never past it.
/// Anything else applies the zone's activity rate, minus the cooling power
/// when cooling, and clamps to `[min_with_cooling, max]` while cooling or
/// `[min, max]` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureModel {
    config: TemperatureConfig,
    current: f32,
}

impl TemperatureModel {
    /// Create a model at baseline
    pub fn new(config: TemperatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            current: config.min,
            config,
        })
    }

    /// Current temperature
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Configuration
    pub fn config(&self) -> &TemperatureConfig {
        &self.config
    }

    /// Zone of the current temperature
    pub fn zone(&self) -> TemperatureZone {
        if self.current < self.config.min {
            TemperatureZone::Cold
        } else {
            TemperatureZone::Standard
        }
    }

    /// Overwrite the temperature, clamped to the widest valid range
    pub fn set_current(&mut self, value: f32) {
        self.current = value.clamp(self.config.min_with_cooling, self.config.max);
    }

    /// Back to baseline
    pub fn reset(&mut self) {
        self.current = self.config.min;
    }

    /// Integrate one tick and return the new temperature
    pub fn tick(&mut self, dt: f32, activity: Activity, cooling: bool) -> f32 {
        let dt = dt.max(0.0);
        let rates = *self.config.rates(self.zone());

        let next = if activity == Activity::Standing && !cooling {
            move_towards(self.current, self.config.min, rates.stand.abs() * dt)
        } else {
            let mut rate = rates.rate(activity);
            if cooling {
                rate -= self.config.cooling_power;
            }
            self.current + rate * dt
        };

        let floor = if cooling {
            self.config.min_with_cooling
        } else {
            self.config.min
        };
        self.current = next.clamp(floor, self.config.max);
        self.current
    }
}
