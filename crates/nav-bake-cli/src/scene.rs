//! Declarative obstacle scenes for offline baking.
//!
//! A scene file stands in for the live collision environment the original
//! editor would probe: a grid configuration plus a list of world-space
//! blocking boxes.
//!
//! ```json
//! {
//!   "grid": { "size_x": 10, "size_y": 4, "size_z": 10, "unit_size": 5 },
//!   "obstacles": [
//!     { "min": [10.0, 0.0, 10.0], "max": [20.0, 20.0, 15.0] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use nalgebra::Point3;
use nav_grid::{Aabb, BoxObstacleProbe, GridConfig};
use serde::{Deserialize, Serialize};

/// One blocking box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleBox {
    /// Minimum corner.
    pub min: [f64; 3],
    /// Maximum corner.
    pub max: [f64; 3],
}

impl ObstacleBox {
    fn as_aabb(self) -> Aabb {
        Aabb::new(
            Point3::new(self.min[0], self.min[1], self.min[2]),
            Point3::new(self.max[0], self.max[1], self.max[2]),
        )
    }
}

/// A bakeable scene: grid shape plus obstacles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Grid dimensions, unit size, and rotation lock.
    #[serde(default)]
    pub grid: GridConfig,
    /// World-space blockers.
    #[serde(default)]
    pub obstacles: Vec<ObstacleBox>,
}

impl SceneFile {
    /// Loads and parses a scene from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading scene file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parsing scene file {}", path.display()))
    }

    /// Builds the probe the bake pass will run against.
    pub fn probe(&self) -> BoxObstacleProbe {
        BoxObstacleProbe::from_boxes(self.obstacles.iter().map(|b| b.as_aabb()).collect())
    }
}
