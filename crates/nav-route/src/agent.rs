//! Waypoint generation for path consumers.

use nalgebra::Point3;
use nav_grid::{CellIndex, NavGrid};

use crate::astar::AStarPathfinder;

/// Turns cell paths into world-space waypoints for a moving agent.
///
/// Holds an explicit grid reference - there is no ambient singleton - and
/// maps each path cell to the world position of its bounds center through
/// the grid's anchoring transform. Steering toward the waypoints is the
/// caller's business.
///
/// # Example
///
/// ```
/// use nav_grid::{GridConfig, NavGrid};
/// use nav_route::NavAgent;
/// use nalgebra::Point3;
///
/// let grid = NavGrid::new(GridConfig::default().with_dimensions(3, 1, 1).with_unit_size(10));
/// let agent = NavAgent::new(&grid);
///
/// let waypoints = agent.path_to(&Point3::new(5.0, 5.0, 5.0), &Point3::new(25.0, 5.0, 5.0));
/// assert_eq!(waypoints.len(), 3);
/// assert_eq!(waypoints[0], Point3::new(5.0, 5.0, 5.0));
/// assert_eq!(waypoints[2], Point3::new(25.0, 5.0, 5.0));
/// ```
pub struct NavAgent<'g> {
    grid: &'g NavGrid,
}

impl<'g> NavAgent<'g> {
    /// Creates an agent bound to the given grid.
    #[must_use]
    pub const fn new(grid: &'g NavGrid) -> Self {
        Self { grid }
    }

    /// World-space waypoints along the shortest path between two positions.
    ///
    /// An empty path (unresolved, non-navigable, or identical endpoints, or
    /// no route) yields an empty waypoint list.
    #[must_use]
    pub fn path_to(&self, from: &Point3<f64>, to: &Point3<f64>) -> Vec<Point3<f64>> {
        let path = AStarPathfinder::new(self.grid).shortest_path(from, to);
        self.waypoints_for(&path)
    }

    /// World-space centers of the given cells, in order.
    ///
    /// Indices that do not resolve on the grid are dropped; paths produced
    /// against this grid always resolve fully.
    #[must_use]
    pub fn waypoints_for(&self, path: &[CellIndex]) -> Vec<Point3<f64>> {
        path.iter()
            .filter_map(|index| {
                let cell = self.grid.cell_at(*index)?;
                Some(self.grid.transform().transform_point(&cell.local_center()))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nav_grid::{GridConfig, GridTransform, Vector3};

    #[test]
    fn test_waypoints_are_cell_centers() {
        let grid = NavGrid::new(
            GridConfig::default()
                .with_dimensions(3, 1, 1)
                .with_unit_size(10),
        );
        let agent = NavAgent::new(&grid);
        let waypoints = agent.path_to(&Point3::new(1.0, 1.0, 1.0), &Point3::new(29.0, 9.0, 9.0));
        assert_eq!(
            waypoints,
            vec![
                Point3::new(5.0, 5.0, 5.0),
                Point3::new(15.0, 5.0, 5.0),
                Point3::new(25.0, 5.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_waypoints_follow_anchoring_transform() {
        let mut grid = NavGrid::new(
            GridConfig::default()
                .with_dimensions(2, 1, 1)
                .with_unit_size(10),
        );
        grid.set_transform(GridTransform::from_translation(Vector3::new(
            100.0, 0.0, 0.0,
        )));

        let agent = NavAgent::new(&grid);
        let waypoints = agent.path_to(
            &Point3::new(105.0, 5.0, 5.0),
            &Point3::new(115.0, 5.0, 5.0),
        );
        assert_eq!(waypoints.len(), 2);
        assert_relative_eq!(waypoints[0].x, 105.0, epsilon = 1e-10);
        assert_relative_eq!(waypoints[1].x, 115.0, epsilon = 1e-10);
    }

    #[test]
    fn test_no_route_yields_no_waypoints() {
        let mut grid = NavGrid::new(
            GridConfig::default()
                .with_dimensions(3, 1, 1)
                .with_unit_size(10),
        );
        grid.set_navigable(nav_grid::CellIndex::new(1, 0, 0), false);

        let agent = NavAgent::new(&grid);
        let waypoints = agent.path_to(&Point3::new(5.0, 5.0, 5.0), &Point3::new(25.0, 5.0, 5.0));
        assert!(waypoints.is_empty());
    }

    #[test]
    fn test_waypoints_for_drops_unresolved_indices() {
        let grid = NavGrid::new(GridConfig::default().with_dimensions(2, 1, 1));
        let agent = NavAgent::new(&grid);
        let waypoints = agent.waypoints_for(&[
            nav_grid::CellIndex::new(0, 0, 0),
            nav_grid::CellIndex::new(9, 9, 9),
        ]);
        assert_eq!(waypoints.len(), 1);
    }
}
