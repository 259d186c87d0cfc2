//! The voxel grid and its hydration-shell placement strategies.
//!
//! [`grid`] is the 3-D occupancy index described in spec.md §4.1: a dense array of
//! [`grid::CellState`] bitsets, an [`grid::Indexer3D`] affine map, and the four
//! cached radial stencils [`grid::Grid::expand_volume`] walks. [`hydration`] builds
//! on it: every [`hydration::HydrationStrategy`] only ever queries a `Grid` for
//! occupancy and classification, never mutates it.
//!
//! # Placing a hydration shell around two atoms
//! ```
//! use saxs_grid::grid::Grid;
//! use saxs_grid::hydration::{HydrationStrategy, DEFAULT_SEED};
//!
//! let centers = vec![(0.0, 0.0, 0.0), (3.0, 0.0, 0.0)];
//! let mut grid = Grid::new(&centers, 0.5, 20, 6);
//! for &c in &centers { grid.add_atom(c); }
//! grid.expand_volume();
//!
//! let strategy = HydrationStrategy::Axes { min_separation: 0.2 };
//! let waters = strategy.generate(&grid, &centers, 1.5, DEFAULT_SEED);
//! assert!(!waters.is_empty());
//! ```

pub mod grid;
pub mod hydration;

pub use grid::{CellState, Grid, Indexer3D};
pub use hydration::{default_culling_for, target_water_count, CullingStrategy, HydrationStrategy, DEFAULT_SEED};
