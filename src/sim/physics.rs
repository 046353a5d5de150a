//! Kinematic pose integration for the differential-drive robot.
//!
//! One command is one discrete step: velocities are per-step increments, not
//! per-second rates, and there is no mass, friction or wheel slip.

use super::geometry::Point2;
use serde::{Deserialize, Serialize};

/// Robot pose in the X/Z plane.
///
/// `yaw` is measured in radians from +Z toward +X and is never wrapped, so
/// the pose after a step is exactly the integrated value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub z: f64,
    pub yaw: f64,
}

impl Pose {
    pub const ORIGIN: Pose = Pose {
        x: 0.0,
        z: 0.0,
        yaw: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, z: f64, yaw: f64) -> Self {
        Self { x, z, yaw }
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.z)
    }

    /// Pose after one forward-Euler step.
    ///
    /// Turns first, then translates along the new heading. The two orders are
    /// not equivalent.
    pub fn integrate(&self, linear: f64, angular: f64) -> Pose {
        let yaw = self.yaw + angular;
        Pose {
            x: self.x + linear * yaw.sin(),
            z: self.z + linear * yaw.cos(),
            yaw,
        }
    }
}
