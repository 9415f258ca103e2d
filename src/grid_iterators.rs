use std::fmt;

use crate::cells::Cartesian3DCoordinate;
use crate::directions::Direction;
use crate::grid_dimensions::GridDimensions;

/// Every cell of a grid in storage order: x fastest, then y, then z.
#[derive(Copy, Clone)]
pub struct CellIter {
    dimensions: GridDimensions,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(dimensions: GridDimensions) -> CellIter {
        CellIter {
            dimensions,
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian3DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian3DCoordinate::from_z_major_index(self.current_cell_number,
                                                                  &self.dimensions);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Axis {
    X,
    Y,
    Z,
}

/// The cells lying on the outer face of the grid in a positive direction, e.g. all cells with
/// `x == width - 1` for `East`. Yielded in storage order restricted to that face.
#[derive(Debug, Copy, Clone)]
pub struct BoundaryIter {
    axis: Axis,
    fixed: u32,
    fast_extent: usize,
    current_index: usize,
    face_cells_count: usize,
}

impl BoundaryIter {
    /// Returns None for the negative directions, whose outer faces are the minimal coordinate
    /// faces and are closed by each cell's own walls.
    pub fn new(dimensions: GridDimensions, dir: Direction) -> Option<BoundaryIter> {
        let (w, h, l) = (dimensions.width().0, dimensions.height().0, dimensions.length().0);

        let (axis, fixed, fast_extent, face_cells_count) = match dir {
            Direction::East => (Axis::X, w - 1, h, h * l),
            Direction::South => (Axis::Y, h - 1, w, w * l),
            Direction::Up => (Axis::Z, l - 1, w, w * h),
            _ => return None,
        };

        Some(BoundaryIter {
            axis,
            fixed: fixed as u32,
            fast_extent,
            current_index: 0,
            face_cells_count,
        })
    }
}

impl ExactSizeIterator for BoundaryIter {}
impl Iterator for BoundaryIter {
    type Item = Cartesian3DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.face_cells_count {
            return None;
        }

        let fast = (self.current_index % self.fast_extent) as u32;
        let slow = (self.current_index / self.fast_extent) as u32;
        self.current_index += 1;

        let coord = match self.axis {
            Axis::X => Cartesian3DCoordinate::new(self.fixed, fast, slow),
            Axis::Y => Cartesian3DCoordinate::new(fast, self.fixed, slow),
            Axis::Z => Cartesian3DCoordinate::new(fast, slow, self.fixed),
        };
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.face_cells_count - self.current_index;
        (remaining, Some(remaining))
    }
}
