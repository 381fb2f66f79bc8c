//! Bake record persistence.
//!
//! A bake pass produces a flat record of per-cell navigability plus the
//! grid dimensions that shaped it. The record is written as JSON under a
//! `NavGridData` directory next to the owning data, and is the only state
//! that survives between sessions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GridError;
use crate::grid::NavGrid;

/// Directory holding the persisted record, created next to the base path.
pub const BAKE_DATA_DIR: &str = "NavGridData";

/// File name of the persisted record inside [`BAKE_DATA_DIR`].
pub const BAKE_DATA_FILE: &str = "navGridBakedData";

/// Navigability of a single cell in the persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBakeRecord {
    /// 1 when the cell is traversable, 0 when obstructed.
    #[serde(rename = "isNavigable")]
    pub is_navigable: i32,
}

/// The persisted shape of a baked grid.
///
/// Cells are stored in the grid's rebuild iteration order: row/X varies
/// slowest, depth/Z fastest. The cell count must equal the product of the
/// declared dimensions; anything else is corruption.
///
/// # Example
///
/// ```
/// use nav_grid::{BakeRecord, CellIndex, GridConfig, NavGrid, NoObstacles};
///
/// let mut grid = NavGrid::new(GridConfig::default().with_dimensions(2, 2, 2));
/// grid.bake(&NoObstacles);
///
/// let record = BakeRecord::from_grid(&grid);
/// assert_eq!(record.nav_units.len(), 8);
/// assert!(record.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakeRecord {
    /// Cell side length, in world units.
    #[serde(rename = "navUnitSize")]
    pub nav_unit_size: i32,
    /// Cell count along X.
    #[serde(rename = "navGridSizeX")]
    pub nav_grid_size_x: i32,
    /// Cell count along Y.
    #[serde(rename = "navGridSizeY")]
    pub nav_grid_size_y: i32,
    /// Cell count along Z.
    #[serde(rename = "navGridSizeZ")]
    pub nav_grid_size_z: i32,
    /// Per-cell navigability flags in rebuild iteration order.
    #[serde(rename = "navUnits")]
    pub nav_units: Vec<CellBakeRecord>,
}

impl BakeRecord {
    /// Snapshots a grid's dimensions and navigability.
    #[must_use]
    pub fn from_grid(grid: &NavGrid) -> Self {
        let nav_units = grid
            .cells()
            .iter()
            .map(|cell| CellBakeRecord {
                is_navigable: i32::from(cell.is_navigable()),
            })
            .collect();

        Self {
            nav_unit_size: grid.unit_size(),
            nav_grid_size_x: grid.size_x(),
            nav_grid_size_y: grid.size_y(),
            nav_grid_size_z: grid.size_z(),
            nav_units,
        }
    }

    /// The cell count implied by the declared dimensions, or `None` when a
    /// dimension is negative.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn declared_cell_count(&self) -> Option<usize> {
        if self.nav_grid_size_x < 0 || self.nav_grid_size_y < 0 || self.nav_grid_size_z < 0 {
            return None;
        }
        (self.nav_grid_size_x as usize)
            .checked_mul(self.nav_grid_size_y as usize)?
            .checked_mul(self.nav_grid_size_z as usize)
    }

    /// Checks the record's internal consistency.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidUnitSize`] for a non-positive unit size, and
    /// [`GridError::CorruptBakeRecord`] when the cell list length disagrees
    /// with the declared dimensions. The grid never truncates, pads, or
    /// guesses around a mismatch.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.nav_unit_size <= 0 {
            return Err(GridError::InvalidUnitSize(self.nav_unit_size));
        }
        let expected = self.declared_cell_count().unwrap_or(0);
        if self.declared_cell_count().is_none() || expected != self.nav_units.len() {
            return Err(GridError::CorruptBakeRecord {
                size_x: self.nav_grid_size_x,
                size_y: self.nav_grid_size_y,
                size_z: self.nav_grid_size_z,
                expected,
                actual: self.nav_units.len(),
            });
        }
        Ok(())
    }

    /// Rebuilds `grid` at the recorded dimensions and applies the recorded
    /// navigability in the same order it was written.
    ///
    /// # Errors
    ///
    /// Propagates [`validate`](Self::validate) failures before touching the
    /// grid.
    pub fn apply_to(&self, grid: &mut NavGrid) -> Result<(), GridError> {
        self.validate()?;

        grid.rebuild(
            self.nav_grid_size_x,
            self.nav_grid_size_y,
            self.nav_grid_size_z,
            self.nav_unit_size,
        );
        for (position, unit) in self.nav_units.iter().enumerate() {
            grid.set_navigable_by_position(position, unit.is_navigable != 0);
        }
        Ok(())
    }
}

/// Filesystem home of the persisted bake record.
///
/// # Example
///
/// ```no_run
/// use nav_grid::{BakeRecord, BakeStore, GridConfig, NavGrid, NoObstacles};
///
/// let mut grid = NavGrid::new(GridConfig::default());
/// grid.bake(&NoObstacles);
///
/// let store = BakeStore::new("scenes/warehouse");
/// store.save(&BakeRecord::from_grid(&grid)).unwrap();
///
/// let mut reloaded = NavGrid::new(GridConfig::default());
/// store.load()?.apply_to(&mut reloaded)?;
/// # Ok::<(), nav_grid::GridError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BakeStore {
    record_path: PathBuf,
}

impl BakeStore {
    /// A store whose record lives at `<base>/NavGridData/navGridBakedData`.
    #[must_use]
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            record_path: base.as_ref().join(BAKE_DATA_DIR).join(BAKE_DATA_FILE),
        }
    }

    /// The full path of the record file.
    #[must_use]
    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    /// Whether a persisted record exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.record_path.exists()
    }

    /// Persists a record, creating the data directory if absent.
    ///
    /// # Errors
    ///
    /// Refuses to persist a record that fails [`BakeRecord::validate`];
    /// otherwise surfaces filesystem and serialization failures.
    pub fn save(&self, record: &BakeRecord) -> Result<(), GridError> {
        record.validate()?;

        if let Some(dir) = self.record_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.record_path, json)?;

        info!(path = %self.record_path.display(), cells = record.nav_units.len(), "saved bake record");
        Ok(())
    }

    /// Loads and validates the persisted record.
    ///
    /// # Errors
    ///
    /// [`GridError::MissingBakeData`] when no record exists; otherwise IO,
    /// parse, and consistency failures propagate to the caller.
    pub fn load(&self) -> Result<BakeRecord, GridError> {
        if !self.exists() {
            return Err(GridError::MissingBakeData {
                path: self.record_path.clone(),
            });
        }
        let json = fs::read_to_string(&self.record_path)?;
        let record: BakeRecord = serde_json::from_str(&json)?;
        record.validate()?;

        info!(path = %self.record_path.display(), cells = record.nav_units.len(), "loaded bake record");
        Ok(record)
    }

    /// Loads the record and applies it to `grid` in one step.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load); the grid is untouched on failure.
    pub fn load_into(&self, grid: &mut NavGrid) -> Result<(), GridError> {
        self.load()?.apply_to(grid)
    }

    /// Deletes the persisted record if present.
    ///
    /// Returns whether a record was removed; a missing record is not an
    /// error, keeping the command idempotent. Callers revert the live grid
    /// with a [`NavGrid::rebuild`].
    ///
    /// # Errors
    ///
    /// Surfaces filesystem failures other than the file being absent.
    pub fn invalidate(&self) -> Result<bool, GridError> {
        match fs::remove_file(&self.record_path) {
            Ok(()) => {
                info!(path = %self.record_path.display(), "removed bake record");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aabb::Aabb;
    use crate::cell::CellIndex;
    use crate::config::GridConfig;
    use crate::probe::BoxObstacleProbe;
    use nalgebra::Point3;

    fn baked_2x2x2() -> NavGrid {
        let mut grid = NavGrid::new(
            GridConfig::default()
                .with_dimensions(2, 2, 2)
                .with_unit_size(10),
        );
        // Obstruct cell (0,0,0) only.
        let probe = BoxObstacleProbe::new().with_blocker(Aabb::new(
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(9.0, 9.0, 9.0),
        ));
        grid.bake(&probe);
        grid
    }

    #[test]
    fn test_record_from_grid_order_and_counts() {
        let grid = baked_2x2x2();
        let record = BakeRecord::from_grid(&grid);
        assert_eq!(record.nav_unit_size, 10);
        assert_eq!(record.nav_units.len(), 8);
        // Cell (0,0,0) is first in rebuild order and obstructed.
        assert_eq!(record.nav_units[0].is_navigable, 0);
        assert!(record.nav_units[1..].iter().all(|u| u.is_navigable == 1));
    }

    #[test]
    fn test_validate_accepts_consistent_record() {
        let record = BakeRecord::from_grid(&baked_2x2x2());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let mut record = BakeRecord::from_grid(&baked_2x2x2());
        record.nav_units.pop();
        assert!(matches!(
            record.validate(),
            Err(GridError::CorruptBakeRecord {
                expected: 8,
                actual: 7,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_unit_size() {
        let mut record = BakeRecord::from_grid(&baked_2x2x2());
        record.nav_unit_size = 0;
        assert!(matches!(
            record.validate(),
            Err(GridError::InvalidUnitSize(0))
        ));
    }

    #[test]
    fn test_apply_rebuilds_and_restores_flags() {
        let record = BakeRecord::from_grid(&baked_2x2x2());

        let mut grid = NavGrid::new(GridConfig::default().with_dimensions(5, 5, 5));
        record.apply_to(&mut grid).unwrap();

        assert_eq!((grid.size_x(), grid.size_y(), grid.size_z()), (2, 2, 2));
        assert_eq!(grid.unit_size(), 10);
        assert!(!grid.is_navigable(CellIndex::new(0, 0, 0)));
        assert!(grid.is_navigable(CellIndex::new(1, 1, 1)));
    }

    #[test]
    fn test_apply_refuses_corrupt_record() {
        let mut record = BakeRecord::from_grid(&baked_2x2x2());
        record.nav_grid_size_z = 3;

        let mut grid = NavGrid::new(GridConfig::default().with_dimensions(5, 5, 5));
        assert!(record.apply_to(&mut grid).is_err());
        // Grid untouched on failure.
        assert_eq!(grid.size_x(), 5);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path());

        let grid = baked_2x2x2();
        store.save(&BakeRecord::from_grid(&grid)).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, BakeRecord::from_grid(&grid));
    }

    #[test]
    fn test_store_creates_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path().join("deeper"));
        store.save(&BakeRecord::from_grid(&baked_2x2x2())).unwrap();
        assert!(store.record_path().ends_with("NavGridData/navGridBakedData"));
        assert!(store.exists());
    }

    #[test]
    fn test_load_missing_record_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path());
        assert!(matches!(
            store.load(),
            Err(GridError::MissingBakeData { .. })
        ));
    }

    #[test]
    fn test_load_rejects_tampered_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path());

        let mut record = BakeRecord::from_grid(&baked_2x2x2());
        store.save(&record).unwrap();

        // Corrupt the file on disk: declare one more column than stored.
        record.nav_grid_size_y = 3;
        let json = serde_json::to_string_pretty(&record).unwrap();
        fs::write(store.record_path(), json).unwrap();

        assert!(matches!(
            store.load(),
            Err(GridError::CorruptBakeRecord { .. })
        ));
    }

    #[test]
    fn test_load_rejects_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path());
        fs::create_dir_all(store.record_path().parent().unwrap()).unwrap();
        fs::write(store.record_path(), "not a record").unwrap();

        assert!(matches!(store.load(), Err(GridError::Malformed(_))));
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path());

        store.save(&BakeRecord::from_grid(&baked_2x2x2())).unwrap();
        assert!(store.invalidate().unwrap());
        assert!(!store.exists());
        assert!(!store.invalidate().unwrap());
    }

    #[test]
    fn test_bake_store_invalidate_load_cycle() {
        // Bake -> store -> invalidate -> re-bake -> store -> load reproduces
        // the exact navigability pattern.
        let dir = tempfile::tempdir().unwrap();
        let store = BakeStore::new(dir.path());

        let grid = baked_2x2x2();
        store.save(&BakeRecord::from_grid(&grid)).unwrap();
        store.invalidate().unwrap();
        store.save(&BakeRecord::from_grid(&grid)).unwrap();

        let mut reloaded = NavGrid::new(GridConfig::default());
        store.load_into(&mut reloaded).unwrap();

        assert!(!reloaded.is_navigable(CellIndex::new(0, 0, 0)));
        let navigable = reloaded.cells().iter().filter(|c| c.is_navigable()).count();
        assert_eq!(navigable, 7);
    }

    #[test]
    fn test_record_json_field_names() {
        let record = BakeRecord::from_grid(&baked_2x2x2());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"navUnitSize\""));
        assert!(json.contains("\"navGridSizeX\""));
        assert!(json.contains("\"navUnits\""));
        assert!(json.contains("\"isNavigable\""));
    }
}
