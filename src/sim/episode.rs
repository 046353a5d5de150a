//! Episode state and the motion/collision resolver.
//!
//! [`Simulator`] owns the only mutable state of the bridge. Each command runs
//! the full sequence below against it:
//!
//! ```text
//! 1. snapshot pose
//! 2. integrate (turn, then move)
//! 3. scan at the proposed pose
//! 4. collided = min(distances) < collision_threshold
//! 5. on collision: restore snapshot, collisions += 1
//! 6. reward
//! 7. steps += 1
//! 8. done = collisions >= max_collisions || steps >= max_steps
//! 9. store last reward / done
//! ```
//!
//! `done` is reported, not enforced. Commands after `done` are still applied
//! and keep advancing the counters until the caller resets.

use super::arena::Arena;
use super::physics::Pose;
use super::reward::{RewardConfig, reward};
use super::sensor::{SensorConfig, SensorReading, scan};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Collision threshold and episode caps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// A step collides when the nearest beam reads below this distance
    #[serde(default = "default_collision_threshold")]
    pub collision_threshold: f64,

    /// Episode ends once this many collisions have occurred
    #[serde(default = "default_max_collisions")]
    pub max_collisions: u32,

    /// Episode ends once this many steps have been taken
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

fn default_collision_threshold() -> f64 {
    0.25
}
fn default_max_collisions() -> u32 {
    5
}
fn default_max_steps() -> u32 {
    1000
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            collision_threshold: default_collision_threshold(),
            max_collisions: default_max_collisions(),
            max_steps: default_max_steps(),
        }
    }
}

/// Mutable per-episode state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EpisodeState {
    pub pose: Pose,
    pub steps: u32,
    pub collisions: u32,
    pub last_reward: f64,
    pub last_done: bool,
}

/// Counters reported with every transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub steps: u32,
    pub collisions: u32,
    #[serde(rename = "minDist")]
    pub min_dist: f64,
}

/// Result of one applied command
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Scan at the proposed pose (taken before any rollback)
    pub sensors: SensorReading,
    pub reward: f64,
    pub done: bool,
    pub collided: bool,
    pub info: StepInfo,
}

/// Latest state plus a fresh scan, as pushed to subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub pose: Pose,
    pub sensors: SensorReading,
    pub reward: f64,
    pub done: bool,
}

/// Single-writer simulation of one robot in a fixed arena
#[derive(Debug, Clone)]
pub struct Simulator {
    arena: Arena,
    sensor: SensorConfig,
    reward: RewardConfig,
    limits: EpisodeConfig,
    state: EpisodeState,
}

impl Simulator {
    pub fn new(
        arena: Arena,
        sensor: SensorConfig,
        reward: RewardConfig,
        limits: EpisodeConfig,
    ) -> Self {
        Self {
            arena,
            sensor,
            reward,
            limits,
            state: EpisodeState::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[inline]
    pub fn limits(&self) -> &EpisodeConfig {
        &self.limits
    }

    /// Scan from the current pose.
    pub fn scan(&self) -> SensorReading {
        scan(&self.state.pose, &self.arena, &self.sensor)
    }

    /// Current pose, last reward/done and a freshly computed scan.
    pub fn observe(&self) -> Observation {
        Observation {
            pose: self.state.pose,
            sensors: self.scan(),
            reward: self.state.last_reward,
            done: self.state.last_done,
        }
    }

    /// Apply one velocity command.
    pub fn apply_action(&mut self, linear: f64, angular: f64) -> Transition {
        let previous = self.state.pose;
        self.state.pose = previous.integrate(linear, angular);

        let sensors = self.scan();
        let min_dist = sensors.min_distance();
        let collided = min_dist < self.limits.collision_threshold;

        if collided {
            self.state.pose = previous;
            self.state.collisions += 1;
            debug!(
                "Collision #{} (min distance {:.3}), pose held at ({:.3}, {:.3})",
                self.state.collisions,
                min_dist,
                previous.x,
                previous.z
            );
        }

        let reward = reward(&self.reward, linear, angular, collided);
        self.state.steps += 1;

        let done = self.state.collisions >= self.limits.max_collisions
            || self.state.steps >= self.limits.max_steps;

        if done && !self.state.last_done {
            info!(
                "Episode finished after {} steps ({} collisions)",
                self.state.steps,
                self.state.collisions
            );
        }

        self.state.last_reward = reward;
        self.state.last_done = done;

        Transition {
            sensors,
            reward,
            done,
            collided,
            info: StepInfo {
                steps: self.state.steps,
                collisions: self.state.collisions,
                min_dist,
            },
        }
    }

    /// Start a new episode at the origin. Always succeeds.
    pub fn reset(&mut self) {
        self.state = EpisodeState::default();
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(
            Arena::default(),
            SensorConfig::default(),
            RewardConfig::default(),
            EpisodeConfig::default(),
        )
    }
}
