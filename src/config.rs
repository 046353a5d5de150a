//! Configuration for Kshetra
//!
//! Loads configuration from a TOML file. Every section and field is optional;
//! omitted values fall back to the stock arena:
//!
//! | Parameter | Default |
//! |-----------|---------|
//! | bind_address | 0.0.0.0:8081 |
//! | tick_interval_ms | 50 |
//! | sensor max_range / fov / beams | 4.0 / π/2 / 13 |
//! | collision_threshold | 0.25 |
//! | max_collisions / max_steps | 5 / 1000 |
//! | default command (v, w) | (0.05, 0.0) |
//! | obstacles | 0.5 x 0.5 boxes at (1.2, 1.2), (-1.0, 1.8), (0.2, -1.2) |

use crate::error::{Error, Result};
use crate::sim::{
    Arena, EpisodeConfig, ObstacleSpec, RewardConfig, SensorConfig, Simulator,
    arena::default_obstacles,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub episode: EpisodeConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub command: CommandConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP/WebSocket gateway settings
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Listen address for the gateway
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// State push interval per WebSocket subscriber (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_bind_address() -> String {
    "0.0.0.0:8081".to_string()
}
fn default_tick_interval_ms() -> u64 {
    50
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl NetworkConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Values used for command fields that are absent or not numbers
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_linear")]
    pub default_linear: f64,
    #[serde(default)]
    pub default_angular: f64,
}

fn default_linear() -> f64 {
    0.05
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            default_linear: default_linear(),
            default_angular: 0.0,
        }
    }
}

/// Obstacle layout
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            obstacles: default_obstacles(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        self.sensor
            .validate()
            .map_err(|e| Error::Config(format!("[sensor] {}", e)))?;

        let threshold = self.episode.collision_threshold;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(Error::Config(format!(
                "[episode] collision_threshold must be >= 0, got {}",
                threshold
            )));
        }

        if self.network.tick_interval_ms == 0 {
            return Err(Error::Config(
                "[network] tick_interval_ms must be > 0".to_string(),
            ));
        }

        for (i, obstacle) in self.arena.obstacles.iter().enumerate() {
            if !(obstacle.size[0] > 0.0 && obstacle.size[1] > 0.0) {
                return Err(Error::Config(format!(
                    "[arena] obstacle {} has non-positive size {:?}",
                    i, obstacle.size
                )));
            }
        }

        Ok(())
    }

    /// Build the simulator described by this configuration
    pub fn build_simulator(&self) -> Simulator {
        Simulator::new(
            Arena::from_specs(&self.arena.obstacles),
            self.sensor,
            self.reward,
            self.episode,
        )
    }
}
