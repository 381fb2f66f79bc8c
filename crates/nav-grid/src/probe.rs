//! Obstacle probing.
//!
//! Baking asks the hosting environment one question per cell: does this
//! oriented region overlap blocking geometry? [`ObstacleProbe`] is that
//! question as a trait, so any collision backend can sit behind it.

use nalgebra::UnitQuaternion;

use crate::aabb::Aabb;

/// A blocking, synchronous query against the environment's collision system.
///
/// `region` is the cell's world-space box with scaled extents; `orientation`
/// is the grid's rotation, so the pair describes an oriented box. The grid
/// treats any implementation as a black box.
pub trait ObstacleProbe {
    /// Returns `true` when the oriented region overlaps blocking geometry.
    fn is_obstructed(&self, region: &Aabb, orientation: &UnitQuaternion<f64>) -> bool;
}

/// A probe that reports every region as free.
///
/// # Example
///
/// ```
/// use nav_grid::{GridConfig, NavGrid, NoObstacles};
///
/// let mut grid = NavGrid::new(GridConfig::default().with_dimensions(2, 2, 2));
/// grid.bake(&NoObstacles);
/// assert!(grid.cells().iter().all(nav_grid::NavCell::is_navigable));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleProbe for NoObstacles {
    fn is_obstructed(&self, _region: &Aabb, _orientation: &UnitQuaternion<f64>) -> bool {
        false
    }
}

/// A probe backed by a set of world-space axis-aligned blockers.
///
/// Serves tests and the offline bake tool, where obstacles are declared as
/// boxes rather than queried from a physics engine. The orientation argument
/// is ignored: blockers and query regions are both treated axis-aligned,
/// which is exact whenever the grid's rotation lock is on.
///
/// # Example
///
/// ```
/// use nav_grid::{Aabb, BoxObstacleProbe, ObstacleProbe};
/// use nalgebra::{Point3, UnitQuaternion};
///
/// let probe = BoxObstacleProbe::new()
///     .with_blocker(Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)));
///
/// let hit = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0));
/// let miss = Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
/// let identity = UnitQuaternion::identity();
///
/// assert!(probe.is_obstructed(&hit, &identity));
/// assert!(!probe.is_obstructed(&miss, &identity));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoxObstacleProbe {
    blockers: Vec<Aabb>,
}

impl BoxObstacleProbe {
    /// Creates a probe with no blockers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blockers: Vec::new(),
        }
    }

    /// Creates a probe from a list of blockers.
    #[must_use]
    pub fn from_boxes(blockers: Vec<Aabb>) -> Self {
        Self { blockers }
    }

    /// Adds a blocker.
    #[must_use]
    pub fn with_blocker(mut self, blocker: Aabb) -> Self {
        self.blockers.push(blocker);
        self
    }

    /// Number of blockers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blockers.len()
    }

    /// Whether the probe has no blockers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blockers.is_empty()
    }
}

impl ObstacleProbe for BoxObstacleProbe {
    fn is_obstructed(&self, region: &Aabb, _orientation: &UnitQuaternion<f64>) -> bool {
        self.blockers.iter().any(|blocker| blocker.intersects(region))
    }
}
