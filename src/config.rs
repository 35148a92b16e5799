//! Startup configuration.
//!
//! Every knob has a default, so a config file only needs the fields it
//! changes:
//!
//! ```json
//! {
//!   "particle_count": 40000,
//!   "galaxy": { "branches": 3, "spin": 0.2 },
//!   "motion": { "smoothing_mode": { "mode": "time_normalized", "reference_hz": 60.0 } },
//!   "session": { "dwell_secs": 2.5 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RunError};
use crate::field::{GalaxyParams, DEFAULT_PARTICLE_COUNT};
use crate::gesture::DEFAULT_DWELL;
use crate::motion::MotionConfig;
use crate::source::DEFAULT_INBOX_CAPACITY;

/// Gesture session tunables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds a gesture stays active before auto-reverting.
    pub dwell_secs: f32,
    /// Tokens buffered between frames.
    pub inbox_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dwell_secs: DEFAULT_DWELL.as_secs_f32(),
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn dwell(&self) -> Result<Duration, ConfigError> {
        if !(self.dwell_secs > 0.0) {
            return Err(ConfigError::InvalidDwell(self.dwell_secs));
        }
        Duration::try_from_secs_f32(self.dwell_secs)
            .map_err(|_| ConfigError::InvalidDwell(self.dwell_secs))
    }
}

/// Window and splat appearance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Splat half-size in world units.
    pub point_size: f32,
    pub background: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Gesture Galaxy".into(),
            width: 1280,
            height: 720,
            point_size: 0.08,
            background: [0.0, 0.0, 0.02],
            fov_degrees: 60.0,
        }
    }
}

/// Complete configuration of a galaxy viewer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalaxyConfig {
    pub particle_count: u32,
    pub galaxy: GalaxyParams,
    pub motion: MotionConfig,
    pub session: SessionConfig,
    pub render: RenderConfig,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            galaxy: GalaxyParams::default(),
            motion: MotionConfig::default(),
            session: SessionConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl GalaxyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check everything that would otherwise fail later at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::EmptyField);
        }
        self.galaxy.validate()?;
        self.motion.validate()?;
        self.session.dwell()?;
        if self.session.inbox_capacity == 0 {
            return Err(ConfigError::EmptyInbox);
        }
        Ok(())
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RunError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
