//! The navigation grid.

use nalgebra::{Point3, UnitQuaternion};
use tracing::{debug, info};

use crate::aabb::Aabb;
use crate::cell::{CellIndex, NavCell};
use crate::config::GridConfig;
use crate::probe::ObstacleProbe;
use crate::transform::GridTransform;

/// Angular tolerance below which the orientation counts as identity.
const ROTATION_EPSILON: f64 = 1e-9;

/// A bounded 3D lattice of cubic navigation cells.
///
/// The grid owns its cells in a dense row-major vector (row/X outermost,
/// depth/Z innermost — the same order the bake record is written in), the
/// anchoring transform that places it in world space, and the rebuild, bake,
/// and lookup operations over them.
///
/// Rebuilding replaces the whole cell vector; navigability is meaningful
/// only after a [`bake`](NavGrid::bake) or a load from a persisted record.
///
/// # Example
///
/// ```
/// use nav_grid::{CellIndex, GridConfig, NavGrid};
/// use nalgebra::Point3;
///
/// let grid = NavGrid::new(GridConfig::default().with_dimensions(4, 4, 4).with_unit_size(10));
/// assert_eq!(grid.cell_count(), 64);
///
/// // Indexed lookup is bounds-checked.
/// assert!(grid.cell(3, 3, 3).is_some());
/// assert!(grid.cell(4, 0, 0).is_none());
///
/// // World positions resolve through the anchoring transform.
/// let cell = grid.cell_at_world(&Point3::new(15.0, 5.0, 5.0)).unwrap();
/// assert_eq!(cell.index(), CellIndex::new(1, 0, 0));
///
/// // Positions behind the origin are out of range, not cell zero.
/// assert!(grid.cell_at_world(&Point3::new(-0.5, 5.0, 5.0)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct NavGrid {
    size_x: i32,
    size_y: i32,
    size_z: i32,
    unit_size: i32,
    lock_rotation: bool,
    transform: GridTransform,
    cells: Vec<NavCell>,
}

impl NavGrid {
    /// Builds a grid from a configuration, rebuilding immediately at the
    /// normalized dimensions.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        let normalized = config.normalized();
        let mut grid = Self {
            size_x: 0,
            size_y: 0,
            size_z: 0,
            unit_size: 1,
            lock_rotation: normalized.lock_rotation,
            transform: GridTransform::identity(),
            cells: Vec::new(),
        };
        grid.rebuild(
            normalized.size_x,
            normalized.size_y,
            normalized.size_z,
            normalized.unit_size,
        );
        grid
    }

    /// Discards all cells and reallocates the grid at the given dimensions.
    ///
    /// Negative dimensions are absolute-valued and the unit size is clamped
    /// to at least 1; the rebuild itself always succeeds. Every new cell is
    /// navigable and its bounds derive from its index and the unit size.
    /// Prior navigability is lost unless re-applied from a persisted record.
    pub fn rebuild(&mut self, size_x: i32, size_y: i32, size_z: i32, unit_size: i32) {
        let config = GridConfig::default()
            .with_dimensions(size_x, size_y, size_z)
            .with_unit_size(unit_size)
            .normalized();

        self.size_x = config.size_x;
        self.size_y = config.size_y;
        self.size_z = config.size_z;
        self.unit_size = config.unit_size;

        let mut cells = Vec::with_capacity(config.cell_count());
        for row in 0..self.size_x {
            for col in 0..self.size_y {
                for depth in 0..self.size_z {
                    cells.push(NavCell::new(CellIndex::new(row, col, depth), self.unit_size));
                }
            }
        }
        self.cells = cells;
        self.validate();

        info!(
            size_x = self.size_x,
            size_y = self.size_y,
            size_z = self.size_z,
            unit_size = self.unit_size,
            "rebuilt navigation grid"
        );
    }

    /// The validation pass.
    ///
    /// When rotation lock is on and the anchoring orientation has drifted
    /// from identity, it is snapped back. Self-correcting, never an error.
    pub fn validate(&mut self) {
        if self.lock_rotation && self.transform.is_rotated(ROTATION_EPSILON) {
            debug!("rotation lock active, resetting grid orientation to identity");
            self.transform.rotation = UnitQuaternion::identity();
        }
    }

    /// Cell count along X.
    #[must_use]
    pub const fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Cell count along Y.
    #[must_use]
    pub const fn size_y(&self) -> i32 {
        self.size_y
    }

    /// Cell count along Z.
    #[must_use]
    pub const fn size_z(&self) -> i32 {
        self.size_z
    }

    /// Side length of one cell, in world units.
    #[must_use]
    pub const fn unit_size(&self) -> i32 {
        self.unit_size
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells, in storage (bake record) order.
    #[must_use]
    pub fn cells(&self) -> &[NavCell] {
        &self.cells
    }

    /// The anchoring transform.
    #[must_use]
    pub const fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// Replaces the anchoring transform.
    ///
    /// A rotation applied while rotation lock is on survives only until the
    /// next validation pass.
    pub fn set_transform(&mut self, transform: GridTransform) {
        self.transform = transform;
    }

    /// Whether rotation lock is enabled.
    #[must_use]
    pub const fn rotation_locked(&self) -> bool {
        self.lock_rotation
    }

    /// Enables or disables rotation lock.
    pub fn set_rotation_lock(&mut self, lock: bool) {
        self.lock_rotation = lock;
    }

    /// Maps a cell index to its position in the dense cell vector.
    ///
    /// Returns `None` when any component lies outside `[0, count)`.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn linear_index(&self, index: CellIndex) -> Option<usize> {
        if index.row < 0
            || index.row >= self.size_x
            || index.col < 0
            || index.col >= self.size_y
            || index.depth < 0
            || index.depth >= self.size_z
        {
            return None;
        }
        let row = index.row as usize;
        let col = index.col as usize;
        let depth = index.depth as usize;
        Some((row * self.size_y as usize + col) * self.size_z as usize + depth)
    }

    /// Bounds-checked lookup by raw indices.
    #[must_use]
    pub fn cell(&self, row: i32, col: i32, depth: i32) -> Option<&NavCell> {
        self.cell_at(CellIndex::new(row, col, depth))
    }

    /// Bounds-checked lookup by cell index.
    #[must_use]
    pub fn cell_at(&self, index: CellIndex) -> Option<&NavCell> {
        self.linear_index(index).map(|i| &self.cells[i])
    }

    /// Resolves a world position to the cell containing it.
    ///
    /// The position is pulled into grid-local space through the inverse
    /// anchoring transform and divided by the unit size per axis; the
    /// fractional indices are floored, so positions behind the grid origin
    /// become negative indices and fail the range check rather than
    /// aliasing into cell zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at_world(&self, position: &Point3<f64>) -> Option<&NavCell> {
        let local = self.transform.inverse_transform_point(position);
        let unit = f64::from(self.unit_size);
        let index = CellIndex::new(
            (local.x / unit).floor() as i32,
            (local.y / unit).floor() as i32,
            (local.z / unit).floor() as i32,
        );
        self.cell_at(index)
    }

    /// The cell's bounds pushed into world space: transformed center and
    /// scaled extents.
    ///
    /// The grid's orientation is not folded into the box; probes receive it
    /// separately so the oriented region is described exactly once.
    #[must_use]
    pub fn cell_world_bounds(&self, index: CellIndex) -> Option<Aabb> {
        let cell = self.cell_at(index)?;
        let center = self.transform.transform_point(&cell.local_center());
        let extents = self.transform.scale_vector(&cell.local_bounds().half_extents());
        Some(Aabb::from_center(center, extents))
    }

    /// Whether the cell at `index` is traversable. Out-of-range indices are
    /// not traversable.
    #[must_use]
    pub fn is_navigable(&self, index: CellIndex) -> bool {
        self.cell_at(index).is_some_and(NavCell::is_navigable)
    }

    /// Overwrites one cell's navigability. Returns `false` when the index is
    /// out of range.
    pub fn set_navigable(&mut self, index: CellIndex, navigable: bool) -> bool {
        match self.linear_index(index) {
            Some(i) => {
                self.cells[i].set_navigable(navigable);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_navigable_by_position(&mut self, position: usize, navigable: bool) {
        if let Some(cell) = self.cells.get_mut(position) {
            cell.set_navigable(navigable);
        }
    }

    /// Probes every cell and records the result as navigability.
    ///
    /// Rebuilds at the current dimensions first, then runs one synchronous
    /// pass: each cell's world region and the grid orientation go to the
    /// probe, and `navigable = !obstructed`. Results are staged and applied
    /// only after the full pass, so no partially baked state is observable.
    pub fn bake(&mut self, probe: &dyn ObstacleProbe) {
        self.rebuild(self.size_x, self.size_y, self.size_z, self.unit_size);

        let orientation = self.transform.rotation;
        let staged: Vec<bool> = self
            .cells
            .iter()
            .map(|cell| {
                let center = self.transform.transform_point(&cell.local_center());
                let extents = self
                    .transform
                    .scale_vector(&cell.local_bounds().half_extents());
                let region = Aabb::from_center(center, extents);
                !probe.is_obstructed(&region, &orientation)
            })
            .collect();

        for (cell, navigable) in self.cells.iter_mut().zip(&staged) {
            cell.set_navigable(*navigable);
        }

        let blocked = staged.iter().filter(|navigable| !**navigable).count();
        info!(
            total = self.cells.len(),
            blocked, "baked navigation grid against obstacle probe"
        );
    }
}

impl Default for NavGrid {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
