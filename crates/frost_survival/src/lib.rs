//! Frost Survival - Body temperature and player state
//!
//! # Features
//!
//! - Temperature integrator with cold / standard zones and activity rates
//! - Cooling modifier that lowers both the rate and the floor
//! - Player body: movement state, input lock, motion, visibility counter
//!
//! # Example
//!
//! ```ignore
//! use frost_survival::prelude::*;
//!
//! let mut temperature = TemperatureModel::new(TemperatureConfig::default())?;
//! let now = temperature.tick(dt, Activity::Running, false);
//! ```

pub mod error;
pub mod player;
pub mod temperature;

pub mod prelude {
    pub use crate::error::{Result, SurvivalError};
    pub use crate::player::{MovementState, PlayerBody};
    pub use crate::temperature::{Activity, TemperatureConfig, TemperatureModel, TemperatureZone, ZoneRates};
}

pub use prelude::*;
