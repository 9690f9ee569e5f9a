//! Player configuration loaded from TOML
//!
//! ```toml
//! speed = 150.0
//! random = "per_note_small"
//! time_offset = 1.0
//! target_resolution = 300
//! latency_sec = 0.05
//! fps = 60
//! ```
//!
//! Every key is optional.

use crate::renderer::{RendererConfig, DEFAULT_TARGET_RESOLUTION};
use crate::timeline::builder::{DEFAULT_SPEED, DEFAULT_TIME_OFFSET};
use crate::timeline::{RandomMode, TimelineConfig};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Baseline note speed in pixels per second
    pub speed: f64,
    pub random: RandomMode,
    /// Lead-in seconds before the first note reaches the playhead
    pub time_offset: f64,
    /// Vertical pixel count the display is scaled toward
    pub target_resolution: u32,
    /// Output latency subtracted from the audio clock
    pub latency_sec: f64,
    /// Display refresh rate the host pumps frames at
    pub fps: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            random: RandomMode::None,
            time_offset: DEFAULT_TIME_OFFSET,
            target_resolution: DEFAULT_TARGET_RESOLUTION,
            latency_sec: 0.0,
            fps: 60,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: PlayerConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::Invalid {
                field: "speed",
                reason: "must be a positive number",
            });
        }
        if !(self.time_offset.is_finite() && self.time_offset >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "time_offset",
                reason: "must not be negative",
            });
        }
        if self.target_resolution == 0 {
            return Err(ConfigError::Invalid {
                field: "target_resolution",
                reason: "must be at least 1",
            });
        }
        if !(self.latency_sec.is_finite() && self.latency_sec >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "latency_sec",
                reason: "must not be negative",
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn timeline(&self) -> TimelineConfig {
        TimelineConfig {
            speed: self.speed,
            random: self.random,
            time_offset: self.time_offset,
        }
    }

    pub fn renderer(&self) -> RendererConfig {
        RendererConfig {
            target_resolution: self.target_resolution,
        }
    }

    /// Seconds between display refreshes
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.fps.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid TOML or has mistyped keys
    Parse(String),
    /// A value is out of range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(message) => write!(f, "Invalid config file: {}", message),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid config value for `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
