//! Authored configuration
//!
//! Per-environment aim settings and the per-ball-type physics profile,
//! stored together as JSON. Values are read once and are not mutated while a
//! prediction or tick is running.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::profile::BallPhysicsProfile;
use crate::sim::query::LayerMask;

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Parsed fine but a value is out of range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "JSON parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Path prediction settings for a reflective environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Length of the first leg when nothing is hit
    pub max_distance: f32,
    /// Length of the leg after the bounce
    pub reflection_length: f32,
    /// Nudge off the surface before casting the reflected ray
    pub reflection_offset: f32,
    /// Used when the caller has no radius of its own
    pub ball_radius: f32,
    /// Layers the aim ray can hit
    pub reflective_layers: LayerMask,
    /// Start/direction tolerance for reusing the cached path
    pub cache_epsilon: f32,
    /// Step past a self-hit before re-casting
    pub self_exclusion_offset: f32,
    pub max_self_exclusion_retries: u32,
    /// Aim line stroke width handed to segment geometry
    pub line_width: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            max_distance: MAX_DISTANCE,
            reflection_length: REFLECTION_LENGTH,
            reflection_offset: REFLECTION_OFFSET,
            ball_radius: BALL_RADIUS,
            reflective_layers: LayerMask::default(),
            cache_epsilon: DIRECTION_EPSILON,
            self_exclusion_offset: SELF_EXCLUSION_OFFSET,
            max_self_exclusion_retries: MAX_SELF_EXCLUSION_RETRIES,
            line_width: 0.2,
        }
    }
}

impl AimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_distance > 0.0) || !(self.reflection_length >= 0.0) {
            return Err(ConfigError::Invalid(
                "max_distance must be positive and reflection_length non-negative".into(),
            ));
        }
        if !(self.self_exclusion_offset > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "self_exclusion_offset must be positive, got {}",
                self.self_exclusion_offset
            )));
        }
        if self.max_self_exclusion_retries == 0 {
            return Err(ConfigError::Invalid(
                "max_self_exclusion_retries must be at least 1".into(),
            ));
        }
        if self.line_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "line_width must not be negative, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}

/// Everything a game session reads at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub aim: AimConfig,
    pub profile: BallPhysicsProfile,
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from a file, falling back to defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{} - using default config", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aim.validate()?;
        self.profile.validate()
    }
}
