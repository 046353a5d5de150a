//! Range-finder fan simulation
//!
//! Casts `beams` evenly spaced rays across a field of view centered on the
//! robot heading and reports the nearest obstacle distance per beam.
//!
//! Beam `i` sits at `yaw - fov/2 + i * fov / (beams - 1)`, so the first and
//! last beams lie exactly on the edges of the field of view.

use super::arena::Arena;
use super::geometry::{Point2, ray_aabb};
use super::physics::Pose;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Sensor fan configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Maximum reported distance
    #[serde(default = "default_max_range")]
    pub max_range: f64,

    /// Total angular width of the fan (radians, in (0, 2π])
    #[serde(default = "default_fov")]
    pub fov: f64,

    /// Number of beams (>= 2)
    #[serde(default = "default_beams")]
    pub beams: usize,
}

fn default_max_range() -> f64 {
    4.0
}
fn default_fov() -> f64 {
    FRAC_PI_2
}
fn default_beams() -> usize {
    13
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
            fov: default_fov(),
            beams: default_beams(),
        }
    }
}

impl SensorConfig {
    /// Check the fan invariants, describing the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_range.is_finite() && self.max_range > 0.0) {
            return Err(format!("max_range must be > 0, got {}", self.max_range));
        }
        if !(self.fov > 0.0 && self.fov <= TAU) {
            return Err(format!("fov must be in (0, 2π], got {}", self.fov));
        }
        if self.beams < 2 {
            return Err(format!("beams must be >= 2, got {}", self.beams));
        }
        Ok(())
    }

    /// Angular spacing between adjacent beams.
    #[inline]
    pub fn beam_step(&self) -> f64 {
        self.fov / (self.beams - 1) as f64
    }

    /// World angle of beam `i` for a robot heading `yaw`.
    #[inline]
    pub fn beam_angle(&self, yaw: f64, i: usize) -> f64 {
        yaw - self.fov / 2.0 + i as f64 * self.beam_step()
    }
}

/// One scan of the fan.
///
/// Serializes with the field names browser clients read:
/// `{maxRange, fov, beams, distances}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "maxRange")]
    pub max_range: f64,
    pub fov: f64,
    pub beams: usize,
    pub distances: Vec<f64>,
}

impl SensorReading {
    /// Smallest beam distance (`max_range` if there are no beams).
    pub fn min_distance(&self) -> f64 {
        self.distances
            .iter()
            .copied()
            .fold(self.max_range, f64::min)
    }
}

/// Scan the arena from `pose`.
///
/// Pure and deterministic; safe to call from any number of readers.
pub fn scan(pose: &Pose, arena: &Arena, config: &SensorConfig) -> SensorReading {
    let origin = pose.position();
    let distances = (0..config.beams)
        .map(|i| {
            let dir = Point2::from_heading(config.beam_angle(pose.yaw, i));
            let nearest = arena
                .obstacles()
                .iter()
                .map(|b| ray_aabb(origin, dir, b))
                .fold(f64::INFINITY, f64::min);
            nearest.clamp(0.0, config.max_range)
        })
        .collect();

    SensorReading {
        max_range: config.max_range,
        fov: config.fov,
        beams: config.beams,
        distances,
    }
}
