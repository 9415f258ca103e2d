use error_chain::bail;
use smallvec::SmallVec;
use std::fmt;

use crate::directions::{Direction, DIRECTIONS_COUNT};
use crate::errors::*;
use crate::grid_dimensions::GridDimensions;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian3DCoordinate {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

pub type CoordinateSmallVec = SmallVec<[Cartesian3DCoordinate; DIRECTIONS_COUNT]>;
pub type DirectionSmallVec = SmallVec<[Direction; DIRECTIONS_COUNT]>;

impl Cartesian3DCoordinate {
    pub fn new(x: u32, y: u32, z: u32) -> Cartesian3DCoordinate {
        Cartesian3DCoordinate { x, y, z }
    }

    /// Inverse of the grid storage order: x varies fastest, then y, then z.
    #[inline]
    pub fn from_z_major_index(index: usize, dimensions: &GridDimensions) -> Cartesian3DCoordinate {
        let width = dimensions.width().0;
        let height = dimensions.height().0;
        let x = index % width;
        let y = (index / width) % height;
        let z = index / (width * height);

        Cartesian3DCoordinate::new(x as u32, y as u32, z as u32)
    }
}

impl From<(u32, u32, u32)> for Cartesian3DCoordinate {
    fn from(xyz: (u32, u32, u32)) -> Cartesian3DCoordinate {
        Cartesian3DCoordinate::new(xyz.0, xyz.1, xyz.2)
    }
}

/// Which of the six faces of a cell are open passages. A clear bit is a wall.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Default)]
pub struct PassageMask(u8);

const ALL_DIRECTION_BITS: u8 = 0x3f;

impl PassageMask {
    #[inline]
    pub fn empty() -> PassageMask {
        PassageMask(0)
    }

    pub fn from_bits(bits: u8) -> Result<PassageMask> {
        if bits & !ALL_DIRECTION_BITS != 0 {
            bail!(ErrorKind::InvalidPassageBits(bits));
        }
        Ok(PassageMask(bits))
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_open(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub fn is_walled(self, dir: Direction) -> bool {
        !self.is_open(dir)
    }

    /// A cell with no passages at all has not been carved into.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of open passages.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn open_directions(self) -> DirectionSmallVec {
        Direction::ALL
            .iter()
            .cloned()
            .filter(|dir| self.is_open(*dir))
            .collect()
    }

    #[inline]
    pub(crate) fn open(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    #[inline]
    pub(crate) fn close(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }
}

impl fmt::Debug for PassageMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PassageMask({:#04x} {:?})", self.0, &*self.open_directions())
    }
}
