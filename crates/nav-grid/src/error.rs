//! Error types for grid persistence.

use std::path::PathBuf;

/// Errors surfaced by bake-record persistence.
///
/// Lookups and pathfinding never produce these: out-of-range cells are
/// `None` and unreachable goals are empty paths. Only corrupted or
/// inaccessible persisted data is an error, and it must propagate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GridError {
    /// The record's cell list disagrees with its declared dimensions.
    #[error(
        "bake record holds {actual} cells but declares {size_x}x{size_y}x{size_z} ({expected})"
    )]
    CorruptBakeRecord {
        /// Declared X dimension.
        size_x: i32,
        /// Declared Y dimension.
        size_y: i32,
        /// Declared Z dimension.
        size_z: i32,
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually present.
        actual: usize,
    },

    /// The record declares a non-positive unit size.
    #[error("bake record unit size must be positive, got {0}")]
    InvalidUnitSize(i32),

    /// No persisted record exists at the expected location.
    #[error("no baked data at {path}")]
    MissingBakeData {
        /// The path that was probed.
        path: PathBuf,
    },

    /// Filesystem failure while reading or writing the record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record file is not valid JSON for the expected shape.
    #[error("malformed bake record: {0}")]
    Malformed(#[from] serde_json::Error),
}
