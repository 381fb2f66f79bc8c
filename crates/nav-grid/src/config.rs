//! Grid configuration.

use serde::{Deserialize, Serialize};

/// Configuration surface for a navigation grid.
///
/// Dimensions are taken as signed integers so that negative inputs can be
/// silently absolute-valued, matching the grid's self-correcting validation.
/// The unit size is clamped to at least 1.
///
/// # Example
///
/// ```
/// use nav_grid::GridConfig;
///
/// let config = GridConfig::default()
///     .with_dimensions(20, 5, 20)
///     .with_unit_size(2)
///     .with_rotation_lock(true);
///
/// assert_eq!(config.size_x, 20);
/// assert_eq!(config.unit_size, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cell count along X.
    pub size_x: i32,
    /// Cell count along Y.
    pub size_y: i32,
    /// Cell count along Z.
    pub size_z: i32,
    /// Side length of one cubic cell, in world units.
    pub unit_size: i32,
    /// When set, the grid's orientation is snapped back to identity on
    /// every validation pass.
    #[serde(default = "default_rotation_lock")]
    pub lock_rotation: bool,
}

const fn default_rotation_lock() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size_x: 10,
            size_y: 10,
            size_z: 10,
            unit_size: 10,
            lock_rotation: true,
        }
    }
}

impl GridConfig {
    /// Sets the cell counts.
    #[must_use]
    pub const fn with_dimensions(mut self, size_x: i32, size_y: i32, size_z: i32) -> Self {
        self.size_x = size_x;
        self.size_y = size_y;
        self.size_z = size_z;
        self
    }

    /// Sets the cell side length.
    #[must_use]
    pub const fn with_unit_size(mut self, unit_size: i32) -> Self {
        self.unit_size = unit_size;
        self
    }

    /// Sets whether rotation is locked to identity.
    #[must_use]
    pub const fn with_rotation_lock(mut self, lock: bool) -> Self {
        self.lock_rotation = lock;
        self
    }

    /// Returns a copy with dimensions absolute-valued and the unit size
    /// clamped positive.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_grid::GridConfig;
    ///
    /// let config = GridConfig::default()
    ///     .with_dimensions(-3, 4, -5)
    ///     .with_unit_size(0)
    ///     .normalized();
    ///
    /// assert_eq!((config.size_x, config.size_y, config.size_z), (3, 4, 5));
    /// assert_eq!(config.unit_size, 1);
    /// ```
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            size_x: self.size_x.abs(),
            size_y: self.size_y.abs(),
            size_z: self.size_z.abs(),
            unit_size: self.unit_size.abs().max(1),
            lock_rotation: self.lock_rotation,
        }
    }

    /// Total cell count for these dimensions, after normalization.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn cell_count(self) -> usize {
        let normalized = self.normalized();
        (normalized.size_x as usize) * (normalized.size_y as usize) * (normalized.size_z as usize)
    }
}
