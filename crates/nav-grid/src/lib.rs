//! Bakeable 3D voxel navigation grid.
//!
//! This crate partitions a bounded spatial volume into uniformly sized
//! cubic cells, determines which cells are traversable by probing the
//! environment for obstructions, and persists that navigability for later
//! sessions:
//!
//! - [`NavGrid`] - the dense cell lattice, its anchoring transform, and the
//!   rebuild/bake/lookup operations
//! - [`NavCell`] / [`CellIndex`] - one grid element and its address
//! - [`ObstacleProbe`] - the seam to the hosting environment's collision
//!   system, with [`NoObstacles`] and [`BoxObstacleProbe`] implementations
//! - [`BakeRecord`] / [`BakeStore`] - the persisted navigability artifact
//!   and its filesystem home
//!
//! Pathfinding over the baked grid lives in the `nav-route` crate, which
//! consumes this one.
//!
//! # Coordinate Systems
//!
//! Grid-local space measures world units from the grid's origin corner;
//! cell `(row, col, depth)` spans `[row*u, (row+1)*u]` along X and likewise
//! along Y and Z for unit size `u`. The [`GridTransform`] maps local to
//! world space (scale, then rotation, then translation). World-to-cell
//! resolution floors the fractional indices, so positions behind the origin
//! fall out of range instead of aliasing into the first cell.
//!
//! # Example
//!
//! ```
//! use nav_grid::{Aabb, BoxObstacleProbe, CellIndex, GridConfig, NavGrid};
//! use nalgebra::Point3;
//!
//! let mut grid = NavGrid::new(
//!     GridConfig::default().with_dimensions(4, 4, 4).with_unit_size(10),
//! );
//!
//! // Bake against a declarative obstacle set.
//! let probe = BoxObstacleProbe::new()
//!     .with_blocker(Aabb::new(Point3::new(12.0, 2.0, 2.0), Point3::new(18.0, 8.0, 8.0)));
//! grid.bake(&probe);
//!
//! assert!(!grid.is_navigable(CellIndex::new(1, 0, 0)));
//! assert!(grid.is_navigable(CellIndex::new(0, 0, 0)));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aabb;
mod bake;
mod cell;
mod config;
mod error;
mod grid;
mod probe;
mod transform;

pub use aabb::Aabb;
pub use bake::{BAKE_DATA_DIR, BAKE_DATA_FILE, BakeRecord, BakeStore, CellBakeRecord};
pub use cell::{CellIndex, NavCell};
pub use config::GridConfig;
pub use error::GridError;
pub use grid::NavGrid;
pub use probe::{BoxObstacleProbe, NoObstacles, ObstacleProbe};
pub use transform::GridTransform;

// Re-export nalgebra types used in the public API.
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
