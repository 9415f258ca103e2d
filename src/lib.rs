//! **mazes3d** generates perfect three dimensional mazes and turns them into wall meshes.
//!
//! A `MazeGrid` of passage masks is carved by a randomized depth first walk
//! (`generators::carve`) and `mesh::extract` emits a triangle list of every wall, each shared
//! wall exactly once and the outer boundary fully closed.

pub mod cells;
pub mod directions;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_iterators;
pub mod masks;
pub mod mesh;
pub mod pathing;
pub mod units;
