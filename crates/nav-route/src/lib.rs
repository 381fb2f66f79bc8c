//! A* pathfinding over baked `nav-grid` volumes.
//!
//! This crate answers shortest-path queries against a [`nav_grid::NavGrid`]
//! whose navigability has been baked or loaded:
//!
//! - [`AStarPathfinder`] - minimum-cost search over the 26-connected cell
//!   graph, with Euclidean edge costs and heuristic
//! - [`NavAgent`] - converts cell paths into world-space waypoint lists
//! - [`heuristics`] - the distance functions the search is built on
//!
//! Searches are synchronous and run to completion. Each invocation owns its
//! scratch state, so searches never interfere with one another, and the
//! shared-reference borrow of the grid keeps rebuilds from racing them.
//!
//! # Example
//!
//! ```
//! use nav_grid::{GridConfig, NavGrid};
//! use nav_route::NavAgent;
//! use nalgebra::Point3;
//!
//! let grid = NavGrid::new(GridConfig::default().with_dimensions(5, 5, 5).with_unit_size(10));
//!
//! let agent = NavAgent::new(&grid);
//! let waypoints = agent.path_to(&Point3::new(5.0, 5.0, 5.0), &Point3::new(45.0, 45.0, 45.0));
//! assert!(!waypoints.is_empty());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod agent;
mod astar;
pub mod heuristics;

pub use agent::NavAgent;
pub use astar::AStarPathfinder;
