//! Arena simulation core
//!
//! A kinematic differential-drive robot in a flat arena of box obstacles,
//! sensing with a fan of range-finder beams and scored by a shaped reward.
//!
//! # Coordinate Frame
//!
//! The arena is the horizontal X/Z plane. Heading (`yaw`) is measured from
//! +Z toward +X, so a robot at yaw 0 drives along +Z and the unit direction
//! for angle `a` is `(sin a, cos a)`.
//!
//! # Module Structure
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Ray vs axis-aligned box (slab method) |
//! | [`arena`] | Fixed obstacle list |
//! | [`sensor`] | Beam fan scan |
//! | [`physics`] | Pose and one-step kinematics |
//! | [`reward`] | Transition reward |
//! | [`episode`] | Episode state, collision rollback, reset |
//!
//! Everything except [`episode::Simulator`] is a pure function of its inputs.

pub mod arena;
pub mod episode;
pub mod geometry;
pub mod physics;
pub mod reward;
pub mod sensor;

pub use arena::{Arena, ObstacleSpec};
pub use episode::{EpisodeConfig, EpisodeState, Observation, Simulator, StepInfo, Transition};
pub use geometry::{Aabb, Point2, ray_aabb};
pub use physics::Pose;
pub use reward::{RewardConfig, reward};
pub use sensor::{SensorConfig, SensorReading, scan};
