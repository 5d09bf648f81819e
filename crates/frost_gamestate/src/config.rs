//! Level configuration
//!
//! Handles everything a level session needs at construction time: tuning
//! for every subsystem plus the placement of walls, sentries and threats.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `FROST_DETECTION_THRESHOLD`, `FROST_RESPAWN_SCALE`, `FROST_TICK_RATE`
//! 2. Config file: `frost_level.toml`, then `config/frost_level.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! name = "harbour"
//!
//! [temperature]
//! min = 36.0
//! min_with_cooling = 34.0
//! max = 38.0
//!
//! [detection]
//! detection_threshold = 37.0
//! view_distance = 15.0
//! view_angle = 45.0
//!
//! [respawn]
//! hold = 2.0
//! fade_out = 1.0
//! blackout = 2.0
//! fade_in = 0.5
//!
//! [[sentries]]
//! position = [0.0, 2.0, -10.0]
//! yaw_deg = 180.0
//! spin_speed_deg = 60.0
//!
//! [[threats]]
//! position = [8.0, 0.0, -4.0]
//!
//! [[walls]]
//! position = [3.0, 1.5, -6.0]
//! half_extents = [2.0, 1.5, 0.25]
//! ```

use crate::error::{GameStateError, Result};
use frost_ai::{ProbeConfig, SentryConfig, ThreatConfig};
use frost_math::{Transform, Vec3};
use frost_survival::TemperatureConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Files searched by [`LevelConfig::load`], in order
pub const CONFIG_SEARCH_PATHS: &[&str] = &["frost_level.toml", "config/frost_level.toml"];

/// Respawn phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnTimings {
    /// Locked and frozen before the fade starts
    pub hold: f32,
    /// Fade from clear to black
    pub fade_out: f32,
    /// Held at full black (the reset happens at its start)
    pub blackout: f32,
    /// Fade from black to clear
    pub fade_in: f32,
}

impl Default for RespawnTimings {
    fn default() -> Self {
        Self {
            hold: 2.0,
            fade_out: 1.0,
            blackout: 2.0,
            fade_in: 0.5,
        }
    }
}

impl RespawnTimings {
    /// Every duration multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        let factor = factor.max(0.0);
        Self {
            hold: self.hold * factor,
            fade_out: self.fade_out * factor,
            blackout: self.blackout * factor,
            fade_in: self.fade_in * factor,
        }
    }

    /// Length of a full sequence
    pub fn total(&self) -> f32 {
        self.hold + self.fade_out + self.blackout + self.fade_in
    }
}

/// A static occluding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub position: Vec3,
    pub half_extents: [f32; 3],
}

/// Where a sentry stands and how it differs from the level's detection defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentryPlacement {
    pub position: Vec3,
    #[serde(default)]
    pub yaw_deg: f32,
    #[serde(default)]
    pub view_distance: Option<f32>,
    #[serde(default)]
    pub view_angle: Option<f32>,
    #[serde(default)]
    pub spin_speed_deg: Option<f32>,
}

impl SentryPlacement {
    /// Create a placement using the level defaults
    pub fn new(position: Vec3, yaw_deg: f32) -> Self {
        Self {
            position,
            yaw_deg,
            view_distance: None,
            view_angle: None,
            spin_speed_deg: None,
        }
    }

    /// Spawn transform
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.yaw_deg)
    }

    /// Merge with the level defaults
    pub fn resolve(&self, defaults: &SentryConfig) -> SentryConfig {
        SentryConfig {
            view_distance: self.view_distance.unwrap_or(defaults.view_distance),
            view_angle: self.view_angle.unwrap_or(defaults.view_angle),
            spin_speed_deg: self.spin_speed_deg.unwrap_or(defaults.spin_speed_deg),
            ..*defaults
        }
    }
}

/// Where a threat agent spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatPlacement {
    pub position: Vec3,
    #[serde(default)]
    pub yaw_deg: f32,
}

impl ThreatPlacement {
    /// Spawn transform
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.yaw_deg)
    }
}

/// Player spawn and body shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Vec3,
    pub spawn_yaw_deg: f32,
    pub radius: f32,
    pub half_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::ZERO,
            spawn_yaw_deg: 0.0,
            radius: 0.4,
            half_height: 0.5,
        }
    }
}

impl PlayerConfig {
    /// Spawn transform
    pub fn spawn_transform(&self) -> Transform {
        Transform::from_position_yaw(self.spawn, self.spawn_yaw_deg)
    }
}

/// A point on the scripted player route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub target: Vec3,
    /// Run instead of walk
    #[serde(default)]
    pub run: bool,
    /// Seconds to stand still after arriving
    #[serde(default)]
    pub wait: f32,
    /// Hold the cooling effect while on this leg
    #[serde(default)]
    pub cooling: bool,
}

/// Clock rates and the scripted run driven by the headless runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed clock, ticks per second
    pub fixed_rate: f32,
    /// Frame clock, frames per second
    pub frame_rate: f32,
    /// Simulated seconds
    pub duration: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub route: Vec<RouteWaypoint>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_rate: 50.0,
            frame_rate: 60.0,
            duration: 30.0,
            walk_speed: 2.5,
            run_speed: 6.0,
            route: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Seconds per fixed tick
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.fixed_rate
    }

    /// Seconds per frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

/// Complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    pub temperature: TemperatureConfig,
    pub probe: ProbeConfig,
    /// Defaults for every sentry
    pub detection: SentryConfig,
    pub respawn: RespawnTimings,
    pub threat: ThreatConfig,
    pub player: PlayerConfig,
    pub simulation: SimulationConfig,
    pub sentries: Vec<SentryPlacement>,
    pub threats: Vec<ThreatPlacement>,
    pub walls: Vec<WallConfig>,

    /// File this config came from
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            temperature: TemperatureConfig::default(),
            probe: ProbeConfig::default(),
            detection: SentryConfig::default(),
            respawn: RespawnTimings::default(),
            threat: ThreatConfig::default(),
            player: PlayerConfig::default(),
            simulation: SimulationConfig::default(),
            sentries: Vec::new(),
            threats: Vec::new(),
            walls: Vec::new(),
            config_path: None,
        }
    }
}

impl LevelConfig {
    /// Load from the search paths, then apply environment overrides.
    ///
    /// A missing or broken file falls back to the defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        for path in CONFIG_SEARCH_PATHS {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    config = loaded;
                    log::info!("Loaded level config from {}", path);
                    break;
                }
                Err(e) => log::warn!("Ignoring level config {}: {}", path, e),
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GameStateError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.display().to_string());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("FROST_DETECTION_THRESHOLD") {
            match value.parse::<f32>() {
                Ok(threshold) => {
                    self.detection.detection_threshold = threshold;
                    log::info!("Detection threshold from env: {}", threshold);
                }
                Err(_) => log::warn!("FROST_DETECTION_THRESHOLD is not a number: {:?}", value),
            }
        }

        if let Some(value) = lookup("FROST_RESPAWN_SCALE") {
            match value.parse::<f32>() {
                Ok(scale) if scale >= 0.0 => {
                    self.respawn = self.respawn.scaled(scale);
                    log::info!("Respawn durations scaled by {}", scale);
                }
                _ => log::warn!("FROST_RESPAWN_SCALE must be a non-negative number: {:?}", value),
            }
        }

        if let Some(value) = lookup("FROST_TICK_RATE") {
            match value.parse::<f32>() {
                Ok(rate) if rate > 0.0 => {
                    self.simulation.fixed_rate = rate;
                    log::info!("Fixed tick rate from env: {}", rate);
                }
                _ => log::warn!("FROST_TICK_RATE must be a positive number: {:?}", value),
            }
        }
    }

    /// Check that values are usable
    pub fn validate(&self) -> Result<()> {
        self.temperature.validate()?;

        let respawn = &self.respawn;
        if [respawn.hold, respawn.fade_out, respawn.blackout, respawn.fade_in]
            .iter()
            .any(|d| *d < 0.0)
        {
            return Err(GameStateError::InvalidConfig(
                "respawn durations must not be negative".to_string(),
            ));
        }
        if self.simulation.fixed_rate <= 0.0 || self.simulation.frame_rate <= 0.0 {
            return Err(GameStateError::InvalidConfig(
                "simulation rates must be positive".to_string(),
            ));
        }
        if self.detection.view_distance <= 0.0 {
            return Err(GameStateError::InvalidConfig(
                "sentry view distance must be positive".to_string(),
            ));
        }
        if let Some(wall) = self.walls.iter().find(|w| w.half_extents.iter().any(|h| *h <= 0.0)) {
            return Err(GameStateError::InvalidConfig(format!(
                "wall at {:?} has a non-positive half extent",
                wall.position
            )));
        }
        Ok(())
    }

    /// Log a configuration summary
    pub fn print_summary(&self) {
        log::info!("Level '{}':", self.name);
        log::info!(
            "  Temperature: min {} (cooling {}), max {}",
            self.temperature.min,
            self.temperature.min_with_cooling,
            self.temperature.max
        );
        log::info!(
            "  Detection: threshold {}, view {}m / {} deg",
            self.detection.detection_threshold,
            self.detection.view_distance,
            self.detection.view_angle
        );
        log::info!(
            "  Entities: {} sentries, {} threats, {} walls",
            self.sentries.len(),
            self.threats.len(),
            self.walls.len()
        );
        log::info!("  Respawn: {:.2}s total", self.respawn.total());
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = LevelConfig::default();
        assert_eq!(config.temperature.min, 36.0);
        assert_eq!(config.temperature.min_with_cooling, 34.0);
        assert_eq!(config.detection.detection_threshold, 37.0);
        assert_eq!(config.detection.view_distance, 15.0);
        assert_eq!(config.detection.view_angle, 45.0);
        assert_eq!(config.probe.eye_height, 1.6);
        assert_eq!(config.respawn.total(), 5.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = LevelConfig::from_toml_str(
            r#"
            name = "harbour"

            [temperature]
            max = 39.0

            [temperature.standard]
            run = 0.25
            move = 0.0
            stand = -0.1

            [detection]
            detection_threshold = 36.5

            [[sentries]]
            position = [0.0, 2.0, -10.0]
            yaw_deg = 180.0
            spin_speed_deg = 60.0

            [[threats]]
            position = [8.0, 0.0, -4.0]

            [[walls]]
            position = [3.0, 1.5, -6.0]
            half_extents = [2.0, 1.5, 0.25]
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "harbour");
        assert_eq!(config.temperature.max, 39.0);
        assert_eq!(config.temperature.min, 36.0);
        assert_eq!(config.temperature.standard.run, 0.25);
        assert_eq!(config.detection.detection_threshold, 36.5);
        assert_eq!(config.sentries.len(), 1);
        assert_eq!(config.threats[0].position, Vec3::new(8.0, 0.0, -4.0));
        assert_eq!(config.walls[0].half_extents, [2.0, 1.5, 0.25]);

        let sentry = config.sentries[0].resolve(&config.detection);
        assert_eq!(sentry.spin_speed_deg, 60.0);
        assert_eq!(sentry.view_distance, 15.0);
        assert_eq!(sentry.detection_threshold, 36.5);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            LevelConfig::from_toml_str("name = ["),
            Err(GameStateError::ConfigParse(_))
        ));
        assert!(matches!(
            LevelConfig::from_toml_str("[respawn]\nhold = -1.0"),
            Err(GameStateError::InvalidConfig(_))
        ));
        assert!(matches!(
            LevelConfig::from_toml_str("[temperature]\nmin_with_cooling = 37.0"),
            Err(GameStateError::Survival(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LevelConfig::load_from_file("does/not/exist.toml"),
            Err(GameStateError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("FROST_DETECTION_THRESHOLD", "36.8"),
            ("FROST_RESPAWN_SCALE", "0.5"),
            ("FROST_TICK_RATE", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = LevelConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.detection.detection_threshold, 36.8);
        assert_eq!(config.respawn.hold, 1.0);
        assert_eq!(config.respawn.fade_in, 0.25);
        assert_eq!(config.simulation.fixed_rate, 50.0);
    }
}
