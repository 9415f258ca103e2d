use error_chain::bail;
use rand::Rng;
use std::u32;

use crate::cells::Cartesian3DCoordinate;
use crate::errors::*;
use crate::units::{EdgesCount, Height, Length, NodesCount, Width};


/// The fixed `W x H x L` bounds of a maze grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GridDimensions {
    width: Width,
    height: Height,
    length: Length,
}

impl GridDimensions {
    /// Every dimension must be positive and the cell count addressable with `u32` coordinates.
    pub fn new(width: Width, height: Height, length: Length) -> Result<GridDimensions> {

        let (w, h, l) = (width.0, height.0, length.0);
        let size = w.checked_mul(h).and_then(|wh| wh.checked_mul(l));

        match size {
            Some(cells) if cells > 0 && cells <= u32::MAX as usize => Ok(GridDimensions {
                width,
                height,
                length,
            }),
            _ => {
                bail!(ErrorKind::InvalidDimensions(w, h, l));
            }
        }
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline(always)]
    pub fn length(&self) -> Length {
        self.length
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.width.0 * self.height.0 * self.length.0)
    }

    /// Cells count and the number of adjacent cell pairs, which bounds the passages any
    /// carving can open.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (w, h, l) = (self.width.0, self.height.0, self.length.0);
        let adjacent_pairs = (w - 1) * h * l + w * (h - 1) * l + w * h * (l - 1);
        (self.size(), EdgesCount(adjacent_pairs))
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian3DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0 &&
        (coord.z as usize) < self.length.0
    }

    /// Convert a grid coordinate to a one dimensional z-major index in the range 0..size.
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Cartesian3DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
            Some((z * self.height.0 + y) * self.width.0 + x)
        } else {
            None
        }
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cartesian3DCoordinate {
        let index = rng.gen_range(0..self.size().0);
        Cartesian3DCoordinate::from_z_major_index(index, self)
    }
}
