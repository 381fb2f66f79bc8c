//! Cell index and cell types.

use nalgebra::Point3;

use crate::aabb::Aabb;

/// A discrete cell address in the navigation grid.
///
/// Uses `i32` components so that world-to-grid conversion can produce
/// negative indices, which then fail the grid's range check instead of
/// aliasing into the first cell.
///
/// The axes follow the grid's storage order: `row` along X, `col` along Y,
/// `depth` along Z.
///
/// # Example
///
/// ```
/// use nav_grid::CellIndex;
///
/// let index = CellIndex::new(1, 2, 3);
/// assert_eq!(index.row, 1);
/// assert_eq!(index.col, 2);
/// assert_eq!(index.depth, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellIndex {
    /// Row (X axis).
    pub row: i32,
    /// Column (Y axis).
    pub col: i32,
    /// Depth (Z axis).
    pub depth: i32,
}

impl CellIndex {
    /// Creates a new cell index.
    #[must_use]
    pub const fn new(row: i32, col: i32, depth: i32) -> Self {
        Self { row, col, depth }
    }

    /// The cell at the grid origin corner.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the index as a tuple.
    #[must_use]
    pub const fn as_tuple(self) -> (i32, i32, i32) {
        (self.row, self.col, self.depth)
    }

    /// Returns all 26 neighboring indices (the full 3x3x3 block minus the
    /// center itself).
    ///
    /// Neighbors may lie outside the grid; the grid's lookup rejects those.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_grid::CellIndex;
    ///
    /// let neighbors = CellIndex::new(0, 0, 0).neighbors();
    /// assert_eq!(neighbors.len(), 26);
    /// assert!(!neighbors.contains(&CellIndex::new(0, 0, 0)));
    /// assert!(neighbors.contains(&CellIndex::new(-1, -1, -1)));
    /// assert!(neighbors.contains(&CellIndex::new(1, 1, 1)));
    /// ```
    #[must_use]
    pub fn neighbors(self) -> [Self; 26] {
        let mut result = [Self::origin(); 26];
        let mut idx = 0;

        for dr in -1i32..=1 {
            for dc in -1i32..=1 {
                for dd in -1i32..=1 {
                    if dr == 0 && dc == 0 && dd == 0 {
                        continue;
                    }
                    result[idx] = Self::new(
                        self.row.wrapping_add(dr),
                        self.col.wrapping_add(dc),
                        self.depth.wrapping_add(dd),
                    );
                    idx += 1;
                }
            }
        }

        result
    }
}

impl From<(i32, i32, i32)> for CellIndex {
    fn from((row, col, depth): (i32, i32, i32)) -> Self {
        Self::new(row, col, depth)
    }
}

impl From<CellIndex> for (i32, i32, i32) {
    fn from(index: CellIndex) -> Self {
        index.as_tuple()
    }
}

/// One element of the navigation grid.
///
/// Holds the immutable cell address, the grid-local bounding box derived
/// from it, and the navigability flag written by baking or loading. Search
/// bookkeeping lives in the pathfinder's per-search context, never here.
#[derive(Debug, Clone)]
pub struct NavCell {
    index: CellIndex,
    bounds: Aabb,
    navigable: bool,
}

impl NavCell {
    /// Creates a cell at the given index, deriving its local bounds from
    /// the unit size. Cells start navigable.
    #[must_use]
    pub(crate) fn new(index: CellIndex, unit_size: i32) -> Self {
        Self {
            index,
            bounds: Self::local_bounds_for(index, unit_size),
            navigable: true,
        }
    }

    /// The grid-local bounding box of a cell: a cube of side `unit_size`
    /// whose minimum corner sits at `index * unit_size`.
    ///
    /// A pure function of the index and unit size.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_grid::{CellIndex, NavCell};
    ///
    /// let bounds = NavCell::local_bounds_for(CellIndex::new(1, 0, 0), 10);
    /// assert_eq!(bounds.center().x, 15.0);
    /// assert_eq!(bounds.half_extents().x, 5.0);
    /// ```
    #[must_use]
    pub fn local_bounds_for(index: CellIndex, unit_size: i32) -> Aabb {
        let unit = f64::from(unit_size);
        let half = unit * 0.5;
        let center = Point3::new(
            f64::from(index.row).mul_add(unit, half),
            f64::from(index.col).mul_add(unit, half),
            f64::from(index.depth).mul_add(unit, half),
        );
        Aabb::from_center(center, nalgebra::Vector3::new(half, half, half))
    }

    /// The cell's address in the grid.
    #[must_use]
    pub const fn index(&self) -> CellIndex {
        self.index
    }

    /// The cell's bounding box in grid-local space.
    #[must_use]
    pub const fn local_bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// The center of the cell's grid-local bounds.
    #[must_use]
    pub fn local_center(&self) -> Point3<f64> {
        self.bounds.center()
    }

    /// Whether the cell is traversable.
    ///
    /// Authoritative only after a bake or a load; freshly rebuilt cells
    /// default to `true`.
    #[must_use]
    pub const fn is_navigable(&self) -> bool {
        self.navigable
    }

    pub(crate) fn set_navigable(&mut self, navigable: bool) {
        self.navigable = navigable;
    }
}
