//! A* search over the grid's 26-connected cell graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use nalgebra::Point3;
use nav_grid::{CellIndex, NavCell, NavGrid};
use tracing::debug;

use crate::heuristics::center_distance;

/// Per-cell search bookkeeping, owned by a single search invocation.
///
/// A fresh vector of these is allocated for every search, so the records
/// never leak state between searches and concurrent searches against the
/// same grid each get independent storage.
#[derive(Debug, Clone, Copy)]
struct ScratchRecord {
    g: f64,
    #[allow(dead_code)] // written with g and f; read when dumping search state
    h: f64,
    f: f64,
    parent: Option<usize>,
    closed: bool,
}

impl ScratchRecord {
    const fn neutral() -> Self {
        Self {
            g: 0.0,
            h: f64::INFINITY,
            f: f64::INFINITY,
            parent: None,
            closed: false,
        }
    }
}

/// One entry of the open collection.
///
/// Cells may appear more than once; only the entry carrying the cell's best
/// recorded F matters, and stale duplicates are skipped when popped.
#[derive(Debug)]
struct OpenEntry {
    f: f64,
    seq: u64,
    cell: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for a min-heap on F; ties fall back to insertion
        // order so the earliest entry wins.
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum-cost pathfinder over a grid's navigable cells.
///
/// Edges connect each cell to its full 26-neighborhood; edge cost and
/// heuristic are both the Euclidean distance between cell centers, so
/// returned paths are cost-optimal. An unreachable goal yields an empty
/// path - a normal outcome, not an error.
///
/// The pathfinder borrows the grid, so every call site names the grid it
/// searches, and a rebuild (which needs `&mut`) cannot race a search.
///
/// # Example
///
/// ```
/// use nav_grid::{GridConfig, NavGrid};
/// use nav_route::AStarPathfinder;
/// use nalgebra::Point3;
///
/// let grid = NavGrid::new(GridConfig::default().with_dimensions(4, 1, 1).with_unit_size(10));
/// let pathfinder = AStarPathfinder::new(&grid);
///
/// let path = pathfinder.shortest_path(&Point3::new(5.0, 5.0, 5.0), &Point3::new(35.0, 5.0, 5.0));
/// assert_eq!(path.len(), 4);
/// ```
pub struct AStarPathfinder<'g> {
    grid: &'g NavGrid,
}

impl<'g> AStarPathfinder<'g> {
    /// Creates a pathfinder over the given grid.
    #[must_use]
    pub const fn new(grid: &'g NavGrid) -> Self {
        Self { grid }
    }

    /// The grid this pathfinder searches.
    #[must_use]
    pub const fn grid(&self) -> &NavGrid {
        self.grid
    }

    /// Shortest cell path between two world positions.
    ///
    /// Returns an empty path immediately when either position resolves to
    /// no cell, either endpoint cell is non-navigable, or both resolve to
    /// the same cell. Otherwise runs the search; an exhausted search also
    /// yields an empty path.
    #[must_use]
    pub fn shortest_path(&self, from: &Point3<f64>, to: &Point3<f64>) -> Vec<CellIndex> {
        let (Some(start), Some(goal)) = (
            self.grid.cell_at_world(from),
            self.grid.cell_at_world(to),
        ) else {
            return Vec::new();
        };
        self.find_path(start.index(), goal.index())
    }

    /// Shortest cell path between two cells, inclusive of both endpoints.
    ///
    /// The same degenerate rules as [`shortest_path`](Self::shortest_path)
    /// apply: out-of-range, non-navigable, or identical endpoints produce
    /// an empty path.
    #[must_use]
    pub fn find_path(&self, start: CellIndex, goal: CellIndex) -> Vec<CellIndex> {
        let (Some(start_pos), Some(goal_pos)) =
            (self.grid.linear_index(start), self.grid.linear_index(goal))
        else {
            return Vec::new();
        };

        let cells = self.grid.cells();
        if !cells[start_pos].is_navigable() || !cells[goal_pos].is_navigable() {
            return Vec::new();
        }
        if start_pos == goal_pos {
            return Vec::new();
        }

        let goal_cell = &cells[goal_pos];

        let mut scratch = vec![ScratchRecord::neutral(); cells.len()];
        let mut open = BinaryHeap::new();
        let mut seq: u64 = 0;

        open.push(OpenEntry {
            f: center_distance(&cells[start_pos], goal_cell),
            seq,
            cell: start_pos,
        });
        seq += 1;

        while let Some(entry) = open.pop() {
            if scratch[entry.cell].closed {
                // Stale duplicate; a better entry for this cell was already
                // expanded.
                continue;
            }
            scratch[entry.cell].closed = true;

            let current = &cells[entry.cell];
            let current_g = scratch[entry.cell].g;

            for neighbor_index in current.index().neighbors() {
                let Some(neighbor_pos) = self.grid.linear_index(neighbor_index) else {
                    continue;
                };
                let neighbor = &cells[neighbor_pos];
                if !neighbor.is_navigable() {
                    continue;
                }

                if neighbor_pos == goal_pos {
                    // The goal is returned the moment it is discovered, not
                    // when it would be expanded; cells are popped in
                    // non-decreasing F order, so the result stays optimal.
                    scratch[neighbor_pos].parent = Some(entry.cell);
                    return Self::back_trace(cells, &scratch, goal_pos);
                }

                if scratch[neighbor_pos].closed {
                    continue;
                }

                let g = current_g + center_distance(current, neighbor);
                let h = center_distance(neighbor, goal_cell);
                let f = g + h;

                if f < scratch[neighbor_pos].f {
                    scratch[neighbor_pos] = ScratchRecord {
                        g,
                        h,
                        f,
                        parent: Some(entry.cell),
                        closed: false,
                    };
                    open.push(OpenEntry {
                        f,
                        seq,
                        cell: neighbor_pos,
                    });
                    seq += 1;
                }
            }
        }

        debug!(?start, ?goal, "open set exhausted, no path");
        Vec::new()
    }

    /// Follows parent links from the goal back to the root, then reverses
    /// into start-to-goal order.
    fn back_trace(
        cells: &[NavCell],
        scratch: &[ScratchRecord],
        goal_pos: usize,
    ) -> Vec<CellIndex> {
        let mut path = Vec::new();
        let mut current = Some(goal_pos);
        while let Some(pos) = current {
            path.push(cells[pos].index());
            current = match scratch[pos].parent {
                Some(parent) if parent != pos => Some(parent),
                _ => None,
            };
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::heuristics::path_cost;
    use approx::assert_relative_eq;
    use nav_grid::GridConfig;

    fn unit_grid(x: i32, y: i32, z: i32) -> NavGrid {
        NavGrid::new(GridConfig::default().with_dimensions(x, y, z).with_unit_size(1))
    }

    /// Brute-force reference: Dijkstra over the same 26-connected graph.
    fn dijkstra_cost(grid: &NavGrid, start: CellIndex, goal: CellIndex) -> Option<f64> {
        let cells = grid.cells();
        let start_pos = grid.linear_index(start)?;
        let goal_pos = grid.linear_index(goal)?;

        let mut dist = vec![f64::INFINITY; cells.len()];
        let mut visited = vec![false; cells.len()];
        dist[start_pos] = 0.0;

        loop {
            let mut best: Option<usize> = None;
            for (i, d) in dist.iter().enumerate() {
                if !visited[i] && d.is_finite() && best.map_or(true, |b| *d < dist[b]) {
                    best = Some(i);
                }
            }
            let Some(u) = best else { return None };
            if u == goal_pos {
                return Some(dist[u]);
            }
            visited[u] = true;

            for neighbor in cells[u].index().neighbors() {
                let Some(v) = grid.linear_index(neighbor) else {
                    continue;
                };
                if visited[v] || !cells[v].is_navigable() {
                    continue;
                }
                let candidate = dist[u] + center_distance(&cells[u], &cells[v]);
                if candidate < dist[v] {
                    dist[v] = candidate;
                }
            }
        }
    }

    #[test]
    fn test_straight_line_path() {
        let grid = unit_grid(5, 1, 1);
        let path = AStarPathfinder::new(&grid)
            .find_path(CellIndex::new(0, 0, 0), CellIndex::new(4, 0, 0));
        assert_eq!(
            path,
            vec![
                CellIndex::new(0, 0, 0),
                CellIndex::new(1, 0, 0),
                CellIndex::new(2, 0, 0),
                CellIndex::new(3, 0, 0),
                CellIndex::new(4, 0, 0),
            ]
        );
    }

    #[test]
    fn test_diagonal_path_uses_corner_moves() {
        let grid = unit_grid(3, 3, 3);
        let path = AStarPathfinder::new(&grid)
            .find_path(CellIndex::new(0, 0, 0), CellIndex::new(2, 2, 2));
        assert_eq!(path.len(), 3);
        assert_relative_eq!(
            path_cost(&grid, &path),
            2.0 * 3.0_f64.sqrt(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_path_endpoints_inclusive() {
        let grid = unit_grid(4, 4, 1);
        let start = CellIndex::new(0, 3, 0);
        let goal = CellIndex::new(3, 0, 0);
        let path = AStarPathfinder::new(&grid).find_path(start, goal);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn test_same_cell_is_empty() {
        let grid = unit_grid(3, 3, 3);
        let pathfinder = AStarPathfinder::new(&grid);
        assert!(pathfinder
            .find_path(CellIndex::new(1, 1, 1), CellIndex::new(1, 1, 1))
            .is_empty());
        // Two world positions inside the same cell resolve to the same cell.
        assert!(pathfinder
            .shortest_path(&Point3::new(1.2, 1.2, 1.2), &Point3::new(1.8, 1.8, 1.8))
            .is_empty());
    }

    #[test]
    fn test_unresolved_endpoint_is_empty() {
        let grid = unit_grid(3, 3, 3);
        let pathfinder = AStarPathfinder::new(&grid);
        assert!(pathfinder
            .shortest_path(&Point3::new(-1.0, 0.5, 0.5), &Point3::new(2.5, 2.5, 2.5))
            .is_empty());
        assert!(pathfinder
            .find_path(CellIndex::new(0, 0, 0), CellIndex::new(5, 0, 0))
            .is_empty());
    }

    #[test]
    fn test_non_navigable_endpoint_is_empty() {
        let mut grid = unit_grid(3, 3, 3);
        grid.set_navigable(CellIndex::new(0, 0, 0), false);
        let pathfinder = AStarPathfinder::new(&grid);
        assert!(pathfinder
            .find_path(CellIndex::new(0, 0, 0), CellIndex::new(2, 2, 2))
            .is_empty());
        assert!(pathfinder
            .find_path(CellIndex::new(2, 2, 2), CellIndex::new(0, 0, 0))
            .is_empty());
    }

    #[test]
    fn test_walled_off_goal_is_empty() {
        let mut grid = unit_grid(3, 3, 3);
        // Seal the (0,0,0) corner behind its full in-grid neighborhood.
        for neighbor in CellIndex::new(0, 0, 0).neighbors() {
            grid.set_navigable(neighbor, false);
        }
        let path = AStarPathfinder::new(&grid)
            .find_path(CellIndex::new(2, 2, 2), CellIndex::new(0, 0, 0));
        assert!(path.is_empty());
    }

    #[test]
    fn test_path_avoids_blocked_cells() {
        let mut grid = unit_grid(3, 3, 1);
        grid.set_navigable(CellIndex::new(1, 0, 0), false);
        grid.set_navigable(CellIndex::new(1, 1, 0), false);

        let path = AStarPathfinder::new(&grid)
            .find_path(CellIndex::new(0, 0, 0), CellIndex::new(2, 0, 0));
        assert!(!path.is_empty());
        for index in &path {
            assert!(grid.is_navigable(*index));
        }
        // Forced around the wall through column 2.
        assert!(path.contains(&CellIndex::new(1, 2, 0)));
    }

    #[test]
    fn test_repeated_queries_identical() {
        let mut grid = unit_grid(4, 4, 2);
        grid.set_navigable(CellIndex::new(1, 1, 0), false);
        grid.set_navigable(CellIndex::new(2, 2, 1), false);

        let pathfinder = AStarPathfinder::new(&grid);
        let first = pathfinder.find_path(CellIndex::new(0, 0, 0), CellIndex::new(3, 3, 1));
        let second = pathfinder.find_path(CellIndex::new(0, 0, 0), CellIndex::new(3, 3, 1));
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_optimal_on_fully_navigable_grid() {
        let grid = unit_grid(3, 3, 3);
        let pathfinder = AStarPathfinder::new(&grid);

        for goal in [
            CellIndex::new(2, 0, 0),
            CellIndex::new(2, 1, 0),
            CellIndex::new(2, 2, 1),
            CellIndex::new(2, 2, 2),
            CellIndex::new(0, 2, 1),
        ] {
            let start = CellIndex::new(0, 0, 0);
            let path = pathfinder.find_path(start, goal);
            let expected = dijkstra_cost(&grid, start, goal).unwrap();
            assert_relative_eq!(path_cost(&grid, &path), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_optimal_around_wall() {
        let mut grid = unit_grid(3, 3, 1);
        grid.set_navigable(CellIndex::new(1, 0, 0), false);
        grid.set_navigable(CellIndex::new(1, 1, 0), false);

        let start = CellIndex::new(0, 0, 0);
        let goal = CellIndex::new(2, 0, 0);
        let path = AStarPathfinder::new(&grid).find_path(start, goal);
        let expected = dijkstra_cost(&grid, start, goal).unwrap();
        assert_relative_eq!(path_cost(&grid, &path), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_world_space_query() {
        let grid = NavGrid::new(
            GridConfig::default()
                .with_dimensions(4, 1, 1)
                .with_unit_size(10),
        );
        let path = AStarPathfinder::new(&grid)
            .shortest_path(&Point3::new(2.0, 5.0, 5.0), &Point3::new(38.0, 5.0, 5.0));
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], CellIndex::new(0, 0, 0));
        assert_eq!(path[3], CellIndex::new(3, 0, 0));
    }
}
