//! Shaped reward for one transition.
//!
//! Forward motion earns its speed, reverse motion costs half its speed,
//! turning costs a small amount per radian and a collision dominates
//! everything else in the step.

use serde::{Deserialize, Serialize};

/// Reward coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward per unit of forward speed
    #[serde(default = "default_forward_gain")]
    pub forward_gain: f64,

    /// Penalty per unit of reverse speed
    #[serde(default = "default_reverse_gain")]
    pub reverse_gain: f64,

    /// Penalty per radian of turn
    #[serde(default = "default_turn_penalty")]
    pub turn_penalty: f64,

    /// Fixed penalty when the step collided
    #[serde(default = "default_collision_penalty")]
    pub collision_penalty: f64,
}

fn default_forward_gain() -> f64 {
    1.0
}
fn default_reverse_gain() -> f64 {
    0.5
}
fn default_turn_penalty() -> f64 {
    0.05
}
fn default_collision_penalty() -> f64 {
    1.0
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            forward_gain: default_forward_gain(),
            reverse_gain: default_reverse_gain(),
            turn_penalty: default_turn_penalty(),
            collision_penalty: default_collision_penalty(),
        }
    }
}

/// Reward for a command `(linear, angular)` and its collision outcome.
///
/// No hidden state: identical inputs give bit-identical outputs.
pub fn reward(config: &RewardConfig, linear: f64, angular: f64, collided: bool) -> f64 {
    let motion = if linear >= 0.0 {
        config.forward_gain * linear.abs()
    } else {
        -config.reverse_gain * linear.abs()
    };
    let turn = config.turn_penalty * angular.abs();
    let crash = if collided {
        config.collision_penalty
    } else {
        0.0
    };
    motion - turn - crash
}
