//! Distance functions for the grid search.

use nav_grid::{CellIndex, NavCell, NavGrid};

/// Euclidean distance between two cells' local bounds centers.
///
/// Serves as both the edge cost between adjacent cells and the heuristic to
/// the goal. As a straight-line lower bound on any chain of Euclidean edges
/// it never overestimates, so the search stays admissible and its results
/// cost-optimal.
///
/// # Example
///
/// ```
/// use nav_grid::{GridConfig, NavGrid};
/// use nav_route::heuristics::center_distance;
///
/// let grid = NavGrid::new(GridConfig::default().with_dimensions(2, 1, 1).with_unit_size(10));
/// let a = grid.cell(0, 0, 0).unwrap();
/// let b = grid.cell(1, 0, 0).unwrap();
/// assert!((center_distance(a, b) - 10.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn center_distance(a: &NavCell, b: &NavCell) -> f64 {
    nalgebra::distance(&a.local_center(), &b.local_center())
}

/// Total edge cost of a cell path: the sum of center distances between
/// consecutive cells.
///
/// Indices that do not resolve on `grid` contribute nothing; paths produced
/// by the pathfinder against the same grid always resolve fully.
#[must_use]
pub fn path_cost(grid: &NavGrid, path: &[CellIndex]) -> f64 {
    path.windows(2)
        .filter_map(|pair| {
            let a = grid.cell_at(pair[0])?;
            let b = grid.cell_at(pair[1])?;
            Some(center_distance(a, b))
        })
        .sum()
}
