//! 2D ray casting against axis-aligned boxes.
//!
//! The arena lives in the horizontal X/Z plane, so points carry `x` and `z`
//! rather than `x` and `y`.

use serde::{Deserialize, Serialize};

/// Substitute for an exactly-zero direction component before taking its
/// reciprocal.
///
/// This is a known approximation, not a general robustness guarantee: a ray
/// running exactly along a slab boundary may report a hit or miss depending
/// on the sign of the resulting huge-but-finite parametric distances.
pub const ZERO_DIRECTION_EPSILON: f64 = 1e-9;

/// A point (or direction) in the X/Z plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Unit direction for a heading measured from +Z toward +X.
    #[inline]
    pub fn from_heading(angle: f64) -> Self {
        Self::new(angle.sin(), angle.cos())
    }
}

/// Axis-aligned box in the X/Z plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb {
    /// Build a box from its center and full extents.
    pub fn from_center(center: Point2, width: f64, depth: f64) -> Self {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        Self {
            min: Point2::new(center.x - hw, center.z - hd),
            max: Point2::new(center.x + hw, center.z + hd),
        }
    }
}

#[inline]
fn guarded_recip(component: f64) -> f64 {
    if component == 0.0 {
        1.0 / ZERO_DIRECTION_EPSILON
    } else {
        1.0 / component
    }
}

/// Distance along a ray to a box using the slab method.
///
/// Returns `f64::INFINITY` when the ray misses or the box lies entirely
/// behind the origin. A ray starting inside the box reports the distance to
/// its exit boundary.
pub fn ray_aabb(origin: Point2, direction: Point2, aabb: &Aabb) -> f64 {
    let inv_x = guarded_recip(direction.x);
    let inv_z = guarded_recip(direction.z);

    let t1 = (aabb.min.x - origin.x) * inv_x;
    let t2 = (aabb.max.x - origin.x) * inv_x;
    let t3 = (aabb.min.z - origin.z) * inv_z;
    let t4 = (aabb.max.z - origin.z) * inv_z;

    let tmin = t1.min(t2).max(t3.min(t4));
    let tmax = t1.max(t2).min(t3.max(t4));

    if tmax < 0.0 || tmin > tmax {
        return f64::INFINITY;
    }

    if tmin >= 0.0 { tmin } else { tmax }
}
