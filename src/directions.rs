//! The six axis aligned directions of a 3D maze cell and their fixed geometric meaning.
//!
//! Every direction maps to a mask bit, a unit offset, an opposite and the rotation that turns
//! the canonical +Z facing wall quad towards it. All of that lives in one immutable table
//! indexed by direction so no component has to repeat a `match` per question.

use std::convert::TryFrom;
use std::f32::consts::FRAC_PI_2;
use std::f32::consts::PI;

use crate::errors::*;

/// Each discriminant is the passage mask bit for that direction.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Direction {
    /// +Y
    South = 0x01,
    /// -Y
    North = 0x02,
    /// -X
    West = 0x04,
    /// +X
    East = 0x08,
    /// +Z
    Up = 0x10,
    /// -Z
    Down = 0x20,
}

pub const DIRECTIONS_COUNT: usize = 6;

/// The faces every cell checks for a wall of its own, in emission order.
/// Their opposites are covered by the neighbouring cell or by the boundary closing passes.
pub const NEGATIVE_DIRECTIONS: [Direction; 3] = [Direction::North, Direction::West, Direction::Down];

/// The boundary closing passes, in emission order.
pub const POSITIVE_DIRECTIONS: [Direction; 3] = [Direction::East, Direction::South, Direction::Up];

#[derive(Copy, Clone, Debug)]
struct DirectionEntry {
    offset: [i32; 3],
    opposite: Direction,
    face_angle: f32,
    face_axis: [f32; 3],
}

const X_AXIS: [f32; 3] = [1.0, 0.0, 0.0];
const Y_AXIS: [f32; 3] = [0.0, 1.0, 0.0];

// Indexed by `Direction::index`, i.e. bit position.
static DIRECTION_TABLE: [DirectionEntry; DIRECTIONS_COUNT] = [
    DirectionEntry { offset: [0, 1, 0], opposite: Direction::North, face_angle: -FRAC_PI_2, face_axis: X_AXIS },
    DirectionEntry { offset: [0, -1, 0], opposite: Direction::South, face_angle: FRAC_PI_2, face_axis: X_AXIS },
    DirectionEntry { offset: [-1, 0, 0], opposite: Direction::East, face_angle: -FRAC_PI_2, face_axis: Y_AXIS },
    DirectionEntry { offset: [1, 0, 0], opposite: Direction::West, face_angle: FRAC_PI_2, face_axis: Y_AXIS },
    DirectionEntry { offset: [0, 0, 1], opposite: Direction::Down, face_angle: 0.0, face_axis: X_AXIS },
    DirectionEntry { offset: [0, 0, -1], opposite: Direction::Up, face_angle: PI, face_axis: X_AXIS },
];

impl Direction {
    /// All directions in bit order. This is the unshuffled input to maze carving.
    pub const ALL: [Direction; DIRECTIONS_COUNT] = [Direction::South,
                                                    Direction::North,
                                                    Direction::West,
                                                    Direction::East,
                                                    Direction::Up,
                                                    Direction::Down];

    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Position of this direction in `Direction::ALL` and in the direction table.
    #[inline]
    pub fn index(self) -> usize {
        self.bit().trailing_zeros() as usize
    }

    /// Unit offset to the neighbouring cell.
    #[inline]
    pub fn offset(self) -> [i32; 3] {
        DIRECTION_TABLE[self.index()].offset
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        DIRECTION_TABLE[self.index()].opposite
    }

    /// Rotation (radians, unit axis) taking the +Z facing unit quad to the face on this side
    /// of a cell.
    #[inline]
    pub fn face_rotation(self) -> (f32, [f32; 3]) {
        let entry = &DIRECTION_TABLE[self.index()];
        (entry.face_angle, entry.face_axis)
    }

    /// The absolute value of the unit offset. Constant per face orientation, so renderers can
    /// tint walls by axis.
    pub fn axis_tag(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x.abs() as f32, y.abs() as f32, z.abs() as f32]
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.offset().iter().sum::<i32>() < 0
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    /// Exactly one of the six direction bits must be set.
    fn try_from(bits: u8) -> Result<Direction> {
        Direction::ALL
            .iter()
            .cloned()
            .find(|dir| dir.bit() == bits)
            .ok_or_else(|| ErrorKind::InvalidDirectionBits(bits).into())
    }
}
