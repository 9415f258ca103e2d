//! Wall mesh extraction.
//!
//! Turns a carved grid into a flat triangle list, two triangles per wall quad, ready to be
//! uploaded as a vertex buffer. Each interior wall is emitted exactly once: every cell emits its
//! own walled `North`, `West` and `Down` faces (which covers the `South`, `East` and `Up` faces
//! of its neighbours) and three boundary passes then close the maximal `East`, `South` and `Up`
//! faces of the grid.
//!
//! # Vertex Layout
//! - Position: [f32; 3] (12 bytes)
//! - Attribute: [f32; 3] (12 bytes), the absolute unit normal of the quad
//!
//! Total size: 24 bytes, no padding.

use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix3, Rad, Vector3};
use error_chain::bail;
use lazy_static::lazy_static;
use log::debug;

use crate::cells::Cartesian3DCoordinate;
use crate::directions::{Direction, DIRECTIONS_COUNT, NEGATIVE_DIRECTIONS, POSITIVE_DIRECTIONS};
use crate::errors::*;
use crate::grid::MazeGrid;

pub const VERTICES_PER_QUAD: usize = 6;
pub const FLOATS_PER_VERTEX: usize = 6;

/// Corners of the unit quad facing +Z, counter-clockwise seen from outside.
const CANONICAL_QUAD: [[f32; 3]; 4] = [[-1.0, -1.0, 1.0],
                                       [1.0, -1.0, 1.0],
                                       [1.0, 1.0, 1.0],
                                       [-1.0, 1.0, 1.0]];

/// Two triangles over the quad corners.
const QUAD_TRIANGLES: [usize; VERTICES_PER_QUAD] = [0, 1, 2, 0, 2, 3];

type QuadCorners = [[f32; 3]; 4];

lazy_static! {
    // Indexed by `Direction::index`.
    static ref FACE_QUADS: [QuadCorners; DIRECTIONS_COUNT] = build_face_quads();
}

fn build_face_quads() -> [QuadCorners; DIRECTIONS_COUNT] {
    let mut quads = [CANONICAL_QUAD; DIRECTIONS_COUNT];
    for dir in &Direction::ALL {
        let (angle, [ax, ay, az]) = dir.face_rotation();
        let rotation = Matrix3::from_axis_angle(Vector3::new(ax, ay, az), Rad(angle));
        for (corner, canonical) in quads[dir.index()].iter_mut().zip(CANONICAL_QUAD.iter()) {
            let [x, y, z] = *canonical;
            // The rotations are quarter and half turns so every component lands on -1, 0 or 1.
            let rotated = (rotation * Vector3::new(x, y, z)).map(f32::round);
            *corner = [rotated.x, rotated.y, rotated.z];
        }
    }
    quads
}

/// A single mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// World space position.
    pub position: [f32; 3],
    /// Per face orientation tag, constant across the quad.
    pub attribute: [f32; 3],
}

/// Edge length of a cell in world units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallSize(f32);

impl WallSize {
    /// Must be finite and strictly positive.
    pub fn new(size: f32) -> Result<WallSize> {
        if !size.is_finite() || size <= 0.0 {
            bail!(ErrorKind::InvalidWallSize(size));
        }
        Ok(WallSize(size))
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for WallSize {
    fn default() -> WallSize {
        WallSize(1.0)
    }
}

/// The six vertices of the wall on side `dir` of the cell at `coord`.
///
/// The cell is centred at `wall_size * (x, y, z)` and the quad sits `wall_size / 2` out from
/// that centre.
pub fn wall_quad(coord: Cartesian3DCoordinate,
                 dir: Direction,
                 wall_size: WallSize)
                 -> [Vertex; VERTICES_PER_QUAD] {
    let ws = wall_size.value();
    let half = ws / 2.0;
    let centre = [ws * coord.x as f32, ws * coord.y as f32, ws * coord.z as f32];
    let corners = &FACE_QUADS[dir.index()];
    let attribute = dir.axis_tag();

    let mut quad = [Vertex::zeroed(); VERTICES_PER_QUAD];
    for (vertex, &corner_index) in quad.iter_mut().zip(QUAD_TRIANGLES.iter()) {
        let corner = corners[corner_index];
        vertex.position = [centre[0] + half * corner[0],
                           centre[1] + half * corner[1],
                           centre[2] + half * corner[2]];
        vertex.attribute = attribute;
    }
    quad
}

/// Number of wall quads `extract` emits for a grid.
///
/// Each cell owns three negative faces and each passage opens exactly one of them, then the
/// three maximal faces of the grid are closed cell by cell.
pub fn wall_quads_count(grid: &MazeGrid) -> usize {
    let dims = grid.dimensions();
    let (w, h, l) = (dims.width().0, dims.height().0, dims.length().0);
    3 * grid.size() - grid.links_count() + h * l + w * l + w * h
}

/// A flat, non-indexed triangle list of wall vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vertex>,
}

impl MeshBuffer {
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn quads_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// The interleaved `position, attribute` floats, `FLOATS_PER_VERTEX` per vertex.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Native endian bytes of `as_floats`, ready for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

/// Build the wall mesh of a carved grid.
///
/// Cells are visited in storage order and each emits a quad for every walled face in
/// `North, West, Down` order. The `East`, `South` and `Up` boundary faces follow in that order.
pub fn extract(grid: &MazeGrid, wall_size: WallSize) -> MeshBuffer {

    let quads = wall_quads_count(grid);
    let mut vertices = Vec::with_capacity(quads * VERTICES_PER_QUAD);

    for coord in grid.iter() {
        let passages = match grid.get(coord) {
            Some(passages) => passages,
            None => continue,
        };
        for &dir in NEGATIVE_DIRECTIONS.iter().filter(|dir| passages.is_walled(**dir)) {
            vertices.extend_from_slice(&wall_quad(coord, dir, wall_size));
        }
    }

    for &dir in &POSITIVE_DIRECTIONS {
        if let Some(face) = grid.iter_boundary(dir) {
            for coord in face {
                vertices.extend_from_slice(&wall_quad(coord, dir, wall_size));
            }
        }
    }

    debug!("extracted {} wall quads ({} vertices) from {:?}",
           vertices.len() / VERTICES_PER_QUAD,
           vertices.len(),
           grid.dimensions());

    MeshBuffer { vertices }
}
