//! Static arena: an ordered list of box obstacles.
//!
//! Bounds are open. There is no border wall, so driving out of the obstacle
//! field is allowed and simply reads `max_range` on every beam.

use super::geometry::{Aabb, Point2};
use serde::Deserialize;

/// Obstacle as written in configuration: center and full size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObstacleSpec {
    /// Center `[x, z]`
    pub center: [f64; 2],

    /// Full extents `[width, depth]`
    #[serde(default = "default_obstacle_size")]
    pub size: [f64; 2],
}

fn default_obstacle_size() -> [f64; 2] {
    [0.5, 0.5]
}

impl ObstacleSpec {
    pub fn new(cx: f64, cz: f64, width: f64, depth: f64) -> Self {
        Self {
            center: [cx, cz],
            size: [width, depth],
        }
    }

    fn to_aabb(&self) -> Aabb {
        Aabb::from_center(
            Point2::new(self.center[0], self.center[1]),
            self.size[0],
            self.size[1],
        )
    }
}

/// The three 0.5 x 0.5 boxes of the stock arena.
pub fn default_obstacles() -> Vec<ObstacleSpec> {
    vec![
        ObstacleSpec::new(1.2, 1.2, 0.5, 0.5),
        ObstacleSpec::new(-1.0, 1.8, 0.5, 0.5),
        ObstacleSpec::new(0.2, -1.2, 0.5, 0.5),
    ]
}

/// Immutable obstacle set, built once at startup.
#[derive(Debug, Clone)]
pub struct Arena {
    obstacles: Vec<Aabb>,
}

impl Arena {
    /// Build an arena from center+size specs, preserving order.
    pub fn from_specs(specs: &[ObstacleSpec]) -> Self {
        Self {
            obstacles: specs.iter().map(ObstacleSpec::to_aabb).collect(),
        }
    }

    /// Arena with no obstacles.
    pub fn empty() -> Self {
        Self {
            obstacles: Vec::new(),
        }
    }

    #[inline]
    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::from_specs(&default_obstacles())
    }
}
